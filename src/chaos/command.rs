//! The polymorphic chaos command: everything the runner can schedule.
//!
//! Kill/Pause/Stop/Remove and the six Netem variants all implement this one
//! trait, so the runner and the job registry never need to know which
//! concrete command they are driving.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::client::RuntimeClient;
use super::error::ChaosResult;

#[async_trait]
pub trait ChaosCommand: Send + Sync {
    /// Short, stable name used for job ids and log fields (e.g. `"kill"`,
    /// `"netem-delay"`).
    fn kind(&self) -> &'static str;

    /// Execute one iteration of this command against `client`.
    ///
    /// `run_token` is canceled when the job is canceled through the control
    /// surface or the recurring run exits; commands that must reverse a
    /// temporary effect (Pause, Stop) race it against their own timer and
    /// switch to `teardown_token` to guarantee the reversal completes even
    /// though `run_token` is already canceled.
    async fn run(
        &self,
        client: &dyn RuntimeClient,
        run_token: &CancellationToken,
        teardown_token: &CancellationToken,
    ) -> ChaosResult<()>;
}
