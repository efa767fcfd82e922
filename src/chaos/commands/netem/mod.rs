//! Netem: apply a `tc qdisc ... netem` traffic-control discipline to every
//! target in parallel, for a fixed duration, then lets each teardown itself.
//!
//! Unlike Kill/Pause/Stop/Remove, which act on targets sequentially, Netem
//! fans out: every target gets its own task, and the command waits for all
//! of them before reporting the first error in target order (not
//! completion order) so results are reproducible across runs.

pub mod corrupt;
pub mod delay;
pub mod duplicate;
pub mod loss;
pub mod loss_gemodel;
pub mod rate;

pub use corrupt::Corrupt;
pub use delay::Delay;
pub use duplicate::Duplicate;
pub use loss::Loss;
pub use loss_gemodel::LossGemodel;
pub use rate::Rate;

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use ipnet::IpNet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::chaos::client::RuntimeClient;
use crate::chaos::command::ChaosCommand;
use crate::chaos::container::Container;
use crate::chaos::error::{ChaosError, ChaosResult};

/// One netem application: a fixed `tc netem` argument tail, fanned out to
/// every target. Variant constructors (see sibling modules) validate their
/// own parameters and produce this common shape.
pub struct Netem {
    pub kind: &'static str,
    pub targets: Vec<Container>,
    pub iface: String,
    pub args: Vec<String>,
    pub ips: Vec<IpNet>,
    pub port: Option<u16>,
    pub duration: Duration,
    pub image: String,
    pub pull: bool,
    pub dry_run: bool,
}

#[async_trait]
impl ChaosCommand for Netem {
    fn kind(&self) -> &'static str {
        self.kind
    }

    async fn run(
        &self,
        client: &dyn RuntimeClient,
        _run_token: &CancellationToken,
        _teardown_token: &CancellationToken,
    ) -> ChaosResult<()> {
        debug!(kind = self.kind, iface = %self.iface, targets = self.targets.len(), "fanning out netem application");

        // Pre-allocate by position so the scan below reports the first
        // error in target order, not arrival order.
        let futures = self.targets.iter().map(|target| async move {
            client
                .apply_netem(
                    target,
                    &self.iface,
                    &self.args,
                    &self.ips,
                    self.port,
                    self.duration,
                    &self.image,
                    self.pull,
                    self.dry_run,
                )
                .await
                .map_err(|e| ChaosError::action(&target.name, e))
        });

        let results = join_all(futures).await;

        for result in results {
            result?;
        }
        Ok(())
    }
}

/// Validate a `tc` percentage argument, formatted with up to two decimals.
pub(super) fn validate_percentage(field: &str, value: f64) -> ChaosResult<String> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ChaosError::InvalidParameter(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(format!("{value:.2}%"))
}

/// Unlike the reversible container commands, netem has no meaningful
/// "immediate" application: a zero or absent duration would apply and tear
/// down the discipline in the same instant, so it's rejected at construction.
pub(super) fn validate_duration(duration: Duration) -> ChaosResult<()> {
    if duration.is_zero() {
        return Err(ChaosError::InvalidParameter(
            "netem duration must be positive".into(),
        ));
    }
    Ok(())
}

/// Reject anything that isn't a plausible interface name before it reaches a
/// shell-constructed `tc` argument vector.
pub(super) fn validate_iface(iface: &str) -> ChaosResult<()> {
    let mut chars = iface.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if starts_ok && rest_ok {
        Ok(())
    } else {
        Err(ChaosError::InvalidParameter(format!("invalid network interface '{iface}'")))
    }
}

/// Parse every entry in `ips` as a CIDR, failing construction on the first
/// one that doesn't parse. Shared by the CLI and HTTP
/// adapters so both surfaces reject the same malformed input the same way.
pub fn parse_cidrs(ips: &[String]) -> ChaosResult<Vec<IpNet>> {
    ips.iter()
        .map(|s| s.parse::<IpNet>().map_err(|e| ChaosError::InvalidParameter(format!("bad CIDR '{s}': {e}"))))
        .collect()
}
