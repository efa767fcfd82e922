//! `tc netem delay`: fixed latency, with optional jitter and correlation.

use std::time::Duration;

use ipnet::IpNet;

use super::Netem;
use crate::chaos::container::Container;
use crate::chaos::error::ChaosResult;

pub struct Delay;

impl Delay {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        targets: Vec<Container>,
        iface: String,
        time_ms: u64,
        jitter_ms: u64,
        correlation: f64,
        distribution: Option<String>,
        ips: Vec<IpNet>,
        port: Option<u16>,
        duration: Duration,
        image: String,
        pull: bool,
        dry_run: bool,
    ) -> ChaosResult<Netem> {
        super::validate_iface(&iface)?;
        super::validate_duration(duration)?;
        super::validate_percentage("correlation", correlation)?;

        let mut args = vec!["delay".to_string(), format!("{time_ms}ms")];
        if jitter_ms > 0 {
            args.push(format!("{jitter_ms}ms"));
            if correlation > 0.0 {
                args.push(format!("{correlation:.2}%"));
            }
        }
        if let Some(dist) = distribution {
            args.push("distribution".to_string());
            args.push(dist);
        }

        Ok(Netem {
            kind: "netem-delay",
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
    fn builds_plain_delay() {
        let n = Delay::build(
            vec![], "eth0".into(), 100, 0, 0.0, None, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .unwrap();
        assert_eq!(n.args, vec!["delay", "100ms"]);
    }

    #[test]
    fn builds_delay_with_jitter_and_correlation() {
        let n = Delay::build(
            vec![], "eth0".into(), 100, 10, 25.0, None, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .unwrap();
        assert_eq!(n.args, vec!["delay", "100ms", "10ms", "25.00%"]);
    }

    #[test]
    fn rejects_bad_iface() {
        assert!(Delay::build(
            vec![], "eth0;rm".into(), 100, 0, 0.0, None, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .is_err());
    }

    #[test]
    fn rejects_out_of_range_correlation() {
        assert!(Delay::build(
            vec![], "eth0".into(), 100, 10, 150.0, None, vec![], None, Duration::from_secs(1), "img".into(), false, false,
        )
        .is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(Delay::build(
            vec![], "eth0".into(), 100, 0, 0.0, None, vec![], None, Duration::ZERO, "img".into(), false, false,
        )
        .is_err());
    }
}
