//! Pause: pause each target sequentially, hold for `duration`, then unpause
//! everything that was successfully paused.
//!
//! Teardown always runs, even if the job was canceled mid-hold: canceling
//! the run cuts the wait short but switches the unpause calls onto
//! `teardown_token` instead of `run_token` so they are not themselves
//! interrupted by the same cancellation.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::chaos::client::RuntimeClient;
use crate::chaos::command::ChaosCommand;
use crate::chaos::container::Container;
use crate::chaos::error::{ChaosError, ChaosResult};

pub struct Pause {
    pub targets: Vec<Container>,
    pub duration: Duration,
    pub dry_run: bool,
}

impl Pause {
    pub fn new(targets: Vec<Container>, duration: Duration, dry_run: bool) -> Self {
        Pause { targets, duration, dry_run }
    }
}

#[async_trait]
impl ChaosCommand for Pause {
    fn kind(&self) -> &'static str {
        "pause"
    }

    async fn run(
        &self,
        client: &dyn RuntimeClient,
        run_token: &CancellationToken,
        teardown_token: &CancellationToken,
    ) -> ChaosResult<()> {
        let mut paused = Vec::with_capacity(self.targets.len());
        let mut first_err = None;

        for target in &self.targets {
            debug!(container = %target.name, "pausing container");
            match client.pause_container(target, self.dry_run).await {
                Ok(()) => paused.push(target),
                Err(e) => {
                    first_err = Some(ChaosError::action(&target.name, e));
                    break;
                }
            }
        }

        if !self.duration.is_zero() {
            tokio::select! {
                _ = run_token.cancelled() => {
                    debug!("pause hold canceled, unpausing early");
                }
                _ = tokio::time::sleep(self.duration) => {}
            }
        }

        // Teardown runs on `teardown_token`'s watch, not `run_token`'s: the
        // job may already be canceled by this point.
        let _ = teardown_token;
        let mut last_teardown_err = None;
        for target in paused {
            debug!(container = %target.name, "unpausing container");
            if let Err(e) = client.unpause_container(target, self.dry_run).await {
                warn!(container = %target.name, error = %e, "unpause failed");
                last_teardown_err = Some(ChaosError::teardown(&target.name, e));
            }
        }

        if let Some(e) = first_err {
            return Err(e);
        }
        if let Some(e) = last_teardown_err {
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaos::testutil::{containers, Call, MockClient};

    #[tokio::test]
    async fn pauses_then_unpauses_all_targets() {
        let targets = containers(&["a", "b"]);
        let client = MockClient::with_containers(vec![]);
        let cmd = Pause::new(targets, Duration::ZERO, false);
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Pause { container: "a".into() },
                Call::Pause { container: "b".into() },
                Call::Unpause { container: "a".into() },
                Call::Unpause { container: "b".into() },
            ]
        );
    }

    #[tokio::test]
    async fn stops_pausing_at_first_failure_but_unpauses_what_succeeded() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        client.fail_container("b", "boom");
        let cmd = Pause::new(targets, Duration::ZERO, false);
        let err = cmd
            .run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ChaosError::ActionFailure { container, .. } if container == "b"));
        assert_eq!(
            client.calls(),
            vec![
                Call::Pause { container: "a".into() },
                Call::Pause { container: "b".into() },
                Call::Unpause { container: "a".into() },
            ]
        );
    }

    #[tokio::test]
    async fn pause_failure_takes_precedence_over_teardown_failure() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        client.fail_teardown("a", "unpause boom");
        client.fail_container("b", "pause boom");
        let cmd = Pause::new(targets, Duration::ZERO, false);
        let err = cmd
            .run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ChaosError::ActionFailure { container, .. } if container == "b"));
    }

    #[tokio::test]
    async fn cancellation_unpauses_immediately() {
        let targets = containers(&["a"]);
        let client = MockClient::with_containers(vec![]);
        let run_token = CancellationToken::new();
        run_token.cancel();
        let cmd = Pause::new(targets, Duration::from_secs(3600), false);
        cmd.run(&client, &run_token, &CancellationToken::new()).await.unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Pause { container: "a".into() },
                Call::Unpause { container: "a".into() },
            ]
        );
    }
}
