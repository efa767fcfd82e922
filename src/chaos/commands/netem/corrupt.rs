//! `tc netem corrupt`: introduce a single bit error at a random offset in a
//! percentage of packets.

use std::time::Duration;

use ipnet::IpNet;

use super::Netem;
use crate::chaos::container::Container;
use crate::chaos::error::ChaosResult;

pub struct Corrupt;

impl Corrupt {
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

        let mut args = vec!["corrupt".to_string(), pct];
        if correlation > 0.0 {
            args.push(format!("{correlation:.2}%"));
        }

        Ok(Netem {
            kind: "netem-corrupt",
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
