//! `tc netem rate`: cap link throughput, with optional per-packet overhead
//! accounting.

use std::time::Duration;

use ipnet::IpNet;

use super::Netem;
use crate::chaos::container::Container;
use crate::chaos::error::{ChaosError, ChaosResult};

pub struct Rate;

impl Rate {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        targets: Vec<Container>,
        iface: String,
        rate: String,
        packet_overhead: Option<i64>,
        cell_size: Option<i64>,
        cell_overhead: Option<i64>,
        ips: Vec<IpNet>,
        port: Option<u16>,
        duration: Duration,
        image: String,
        pull: bool,
        dry_run: bool,
    ) -> ChaosResult<Netem> {
        super::validate_iface(&iface)?;
        super::validate_duration(duration)?;
        if rate.trim().is_empty() {
            return Err(ChaosError::InvalidParameter("rate must not be empty".into()));
        }

        let mut args = vec!["rate".to_string(), rate];
        if let Some(overhead) = packet_overhead {
            args.push(overhead.to_string());
            if let Some(size) = cell_size {
                args.push(size.to_string());
                if let Some(cell) = cell_overhead {
                    args.push(cell.to_string());
                }
            }
        }

        Ok(Netem {
            kind: "netem-rate",
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
