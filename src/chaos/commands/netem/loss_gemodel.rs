//! `tc netem loss gemodel`: Gilbert-Elliot two-state Markov loss model,
//! parameterized by the probability of entering the bad state (`pg`),
//! leaving it (`pb`), and the loss/receive probabilities within each state
//! (`one_h`, `one_k`).

use std::time::Duration;

use ipnet::IpNet;

use super::Netem;
use crate::chaos::container::Container;
use crate::chaos::error::ChaosResult;

pub struct LossGemodel;

impl LossGemodel {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        targets: Vec<Container>,
        iface: String,
        pg: f64,
        pb: f64,
        one_h: f64,
        one_k: f64,
        ips: Vec<IpNet>,
        port: Option<u16>,
        duration: Duration,
        image: String,
        pull: bool,
        dry_run: bool,
    ) -> ChaosResult<Netem> {
        super::validate_iface(&iface)?;
        super::validate_duration(duration)?;
        let pg_arg = super::validate_percentage("pg", pg)?;
        let pb_arg = super::validate_percentage("pb", pb)?;
        let one_h_arg = super::validate_percentage("one_h", one_h)?;
        let one_k_arg = super::validate_percentage("one_k", one_k)?;

        let mut args = vec!["loss".to_string(), "gemodel".to_string(), pg_arg];
        if pb > 0.0 || one_h > 0.0 || one_k > 0.0 {
            args.push(pb_arg);
        }
        if one_h > 0.0 || one_k > 0.0 {
            args.push(one_h_arg);
        }
        if one_k > 0.0 {
            args.push(one_k_arg);
        }

        Ok(Netem {
            kind: "netem-loss-gemodel",
            targets,
            iface,
            args,
            ips,
            port,
            duration,
            image,
            pull,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_minimal_gemodel() {
        let n = LossGemodel::build(
            vec![], "eth0".into(), 5.0, 0.0, 0.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .unwrap();
        assert_eq!(n.args, vec!["loss", "gemodel", "5.00%"]);
    }

    #[test]
    fn builds_full_gemodel() {
        let n = LossGemodel::build(
            vec![], "eth0".into(), 5.0, 95.0, 10.0, 1.0, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .unwrap();
        assert_eq!(n.args, vec!["loss", "gemodel", "5.00%", "95.00%", "10.00%", "1.00%"]);
    }

    #[test]
    fn rejects_bad_iface() {
        assert!(LossGemodel::build(
            vec![], "bad iface".into(), 5.0, 0.0, 0.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .is_err());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        assert!(LossGemodel::build(
            vec![], "eth0".into(), 150.0, 0.0, 0.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(LossGemodel::build(
            vec![], "eth0".into(), 5.0, 0.0, 0.0, 0.0, vec![], None, Duration::ZERO, "img".into(), false, false,
        )
        .is_err());
    }
}
