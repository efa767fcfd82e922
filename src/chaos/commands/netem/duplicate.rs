//! `tc netem duplicate`: duplicate a percentage of packets.

use std::time::Duration;

use ipnet::IpNet;

use super::Netem;
use crate::chaos::container::Container;
use crate::chaos::error::ChaosResult;

pub struct Duplicate;

impl Duplicate {
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

        let mut args = vec!["duplicate".to_string(), pct];
        if correlation > 0.0 {
            args.push(format!("{correlation:.2}%"));
        }

        Ok(Netem {
            kind: "netem-duplicate",
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
    fn builds_duplicate() {
        let n = Duplicate::build(vec![], "eth0".into(), 2.5, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .unwrap();
        assert_eq!(n.args, vec!["duplicate", "2.50%"]);
    }

    #[test]
    fn rejects_bad_iface() {
        assert!(Duplicate::build(vec![], "eth0 ".into(), 2.5, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .is_err());
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        assert!(Duplicate::build(vec![], "eth0".into(), 200.0, 0.0, vec![], None, Duration::from_secs(1), "img".into(), false, false)
            .is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(Duplicate::build(vec![], "eth0".into(), 2.5, 0.0, vec![], None, Duration::ZERO, "img".into(), false, false)
            .is_err());
    }
}
