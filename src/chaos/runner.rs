//! Drives a [`ChaosCommand`] either once or on a fixed recurring interval.
//!
//! A zero interval means one-shot: run the command once and finish. A
//! non-zero interval means recurring: run, wait out the interval (or
//! cancellation, whichever comes first), repeat, failing fast the moment
//! an iteration errors rather than retrying indefinitely. Iterations never
//! overlap: the next one only starts once the previous has fully returned,
//! including its own teardown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::RuntimeClient;
use super::command::ChaosCommand;
use super::error::ChaosResult;
use super::job::JobRegistry;

pub struct Runner;

impl Runner {
    /// Register `command` in `registry` and spawn it in the background,
    /// returning the job id immediately (the caller does not wait for any
    /// iteration to finish).
    ///
    /// `teardown_token` is a process-lifetime token, distinct from the
    /// per-job cancellation token the registry hands out, so a canceled job
    /// still completes its own cleanup.
    pub fn spawn(
        command: Arc<dyn ChaosCommand>,
        client: Arc<dyn RuntimeClient>,
        interval: Duration,
        registry: Arc<JobRegistry>,
        teardown_token: CancellationToken,
    ) -> String {
        let run_token = CancellationToken::new();
        let id = registry.register(command.kind(), run_token.clone());
        let job_id = id.clone();

        tokio::spawn(async move {
            if let Err(e) = Self::drive(command, client, interval, run_token, teardown_token).await {
                warn!(error = %e, job = %job_id, "job finished with an error");
            }
            registry.complete(&job_id);
        });

        id
    }

    /// Run `command` to completion synchronously (used by the CLI's
    /// one-shot mode, where the process exits with the result).
    pub async fn run_to_completion(
        command: Arc<dyn ChaosCommand>,
        client: Arc<dyn RuntimeClient>,
        interval: Duration,
        run_token: CancellationToken,
        teardown_token: CancellationToken,
    ) -> ChaosResult<()> {
        Self::drive(command, client, interval, run_token, teardown_token).await
    }

    async fn drive(
        command: Arc<dyn ChaosCommand>,
        client: Arc<dyn RuntimeClient>,
        interval: Duration,
        run_token: CancellationToken,
        teardown_token: CancellationToken,
    ) -> ChaosResult<()> {
        if interval.is_zero() {
            return Self::run_once(&*command, &*client, &run_token, &teardown_token).await;
        }

        loop {
            if run_token.is_cancelled() {
                debug!(kind = command.kind(), "recurring run canceled before iteration");
                return Ok(());
            }

            Self::run_once(&*command, &*client, &run_token, &teardown_token).await?;

            tokio::select! {
                _ = run_token.cancelled() => {
                    debug!(kind = command.kind(), "recurring run canceled during interval wait");
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    async fn run_once(
        command: &dyn ChaosCommand,
        client: &dyn RuntimeClient,
        run_token: &CancellationToken,
        teardown_token: &CancellationToken,
    ) -> ChaosResult<()> {
        info!(kind = command.kind(), "running chaos command");
        let result = command.run(client, run_token, teardown_token).await;
        match &result {
            Ok(()) => debug!(kind = command.kind(), "chaos command iteration finished"),
            Err(e) => warn!(kind = command.kind(), error = %e, "chaos command iteration failed"),
        }
        result
    }
}
