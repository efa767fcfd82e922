//! `tc netem loss`: independent (Bernoulli) packet loss.

use std::time::Duration;

use ipnet::IpNet;

use super::Netem;
use crate::chaos::container::Container;
use crate::chaos::error::ChaosResult;

pub struct Loss;

impl Loss {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        targets: Vec<Container>,
        iface: String,
        percentage: f64,
        correlation: f64,
        ips: Vec<IpNet>,
        port: Option<u16>,
        duration: Duration,
        image: String,
        pull: bool,
        dry_run: bool,
    ) -> ChaosResult<Netem> {
        super::validate_iface(&iface)?;
        super::validate_duration(duration)?;
        let pct = super::validate_percentage("percentage", percentage)?;
        super::validate_percentage("correlation", correlation)?;

        let mut args = vec!["loss".to_string(), pct];
        if correlation > 0.0 {
            args.push(format!("{correlation:.2}%"));
        }

        Ok(Netem {
            kind: "netem-loss",
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
    fn builds_loss_without_correlation() {
        let n = Loss::build(vec![], "eth0".into(), 10.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .unwrap();
        assert_eq!(n.args, vec!["loss", "10.00%"]);
    }

    #[test]
    fn builds_loss_with_correlation() {
        let n = Loss::build(vec![], "eth0".into(), 10.0, 25.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .unwrap();
        assert_eq!(n.args, vec!["loss", "10.00%", "25.00%"]);
    }

    #[test]
    fn rejects_bad_iface() {
        assert!(Loss::build(vec![], "".into(), 10.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .is_err());
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        assert!(Loss::build(vec![], "eth0".into(), 150.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(Loss::build(vec![], "eth0".into(), 10.0, 0.0, vec![], None, Duration::ZERO, "img".into(), false, false)
            .is_err());
    }
}
