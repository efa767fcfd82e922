//! Stop: stop each target sequentially, optionally restart it after
//! `duration`. Mirrors [`super::pause::Pause`]'s dual-token teardown,
//! but teardown only happens when `restart` is set; otherwise containers
//! are left stopped, by design.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::chaos::client::RuntimeClient;
use crate::chaos::command::ChaosCommand;
use crate::chaos::container::Container;
use crate::chaos::error::{ChaosError, ChaosResult};

/// Default grace period given to the runtime before it force-kills a
/// container that doesn't stop on its own.
pub const DEFAULT_WAIT_SECONDS: i64 = 5;

pub struct Stop {
    pub targets: Vec<Container>,
    pub duration: Duration,
    pub wait_seconds: i64,
    pub restart: bool,
    pub dry_run: bool,
}

impl Stop {
    pub fn new(targets: Vec<Container>, duration: Duration, wait_seconds: i64, restart: bool, dry_run: bool) -> Self {
        Stop { targets, duration, wait_seconds, restart, dry_run }
    }
}

#[async_trait]
impl ChaosCommand for Stop {
    fn kind(&self) -> &'static str {
        "stop"
    }

    async fn run(
        &self,
        client: &dyn RuntimeClient,
        run_token: &CancellationToken,
        _teardown_token: &CancellationToken,
    ) -> ChaosResult<()> {
        let mut stopped = Vec::with_capacity(self.targets.len());
        let mut first_err = None;

        for target in &self.targets {
            debug!(container = %target.name, "stopping container");
            match client.stop_container(target, self.wait_seconds, self.dry_run).await {
                Ok(()) => stopped.push(target),
                Err(e) => {
                    first_err = Some(ChaosError::action(&target.name, e));
                    break;
                }
            }
        }

        if !self.restart {
            return match first_err {
                Some(e) => Err(e),
                None => Ok(()),
            };
        }

        if !self.duration.is_zero() {
            tokio::select! {
                _ = run_token.cancelled() => {
                    debug!("stop hold canceled, restarting early");
                }
                _ = tokio::time::sleep(self.duration) => {}
            }
        }

        let mut last_teardown_err = None;
        for target in stopped {
            debug!(container = %target.name, "restarting container");
            if let Err(e) = client.start_container(target, self.dry_run).await {
                warn!(container = %target.name, error = %e, "restart failed");
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
    async fn without_restart_leaves_targets_stopped() {
        let targets = containers(&["a", "b"]);
        let client = MockClient::with_containers(vec![]);
        let cmd = Stop::new(targets, Duration::ZERO, DEFAULT_WAIT_SECONDS, false, false);
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Stop { container: "a".into() },
                Call::Stop { container: "b".into() },
            ]
        );
    }

    #[tokio::test]
    async fn with_restart_starts_back_up() {
        let targets = containers(&["a", "b"]);
        let client = MockClient::with_containers(vec![]);
        let cmd = Stop::new(targets, Duration::ZERO, DEFAULT_WAIT_SECONDS, true, false);
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Stop { container: "a".into() },
                Call::Stop { container: "b".into() },
                Call::Start { container: "a".into() },
                Call::Start { container: "b".into() },
            ]
        );
    }

    #[tokio::test]
    async fn restart_fires_immediately_on_cancellation_during_hold() {
        let targets = containers(&["c1", "c2", "c3"]);
        let client = MockClient::with_containers(vec![]);
        let run_token = CancellationToken::new();
        let cmd = Stop::new(targets, Duration::from_secs(3600), DEFAULT_WAIT_SECONDS, true, false);

        let cancel_token = run_token.clone();
        tokio::spawn(async move { cancel_token.cancel() });

        cmd.run(&client, &run_token, &CancellationToken::new()).await.unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Stop { container: "c1".into() },
                Call::Stop { container: "c2".into() },
                Call::Stop { container: "c3".into() },
                Call::Start { container: "c1".into() },
                Call::Start { container: "c2".into() },
                Call::Start { container: "c3".into() },
            ]
        );
    }

    #[tokio::test]
    async fn stop_failure_takes_precedence_over_teardown_failure() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        client.fail_teardown("a", "restart boom");
        client.fail_container("b", "stop boom");
        let cmd = Stop::new(targets, Duration::ZERO, DEFAULT_WAIT_SECONDS, true, false);
        let err = cmd
            .run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ChaosError::ActionFailure { container, .. } if container == "b"));
    }

    #[tokio::test]
    async fn stops_at_first_failure_without_restart() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        client.fail_container("b", "boom");
        let cmd = Stop::new(targets, Duration::ZERO, DEFAULT_WAIT_SECONDS, false, false);
        let err = cmd
            .run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ChaosError::ActionFailure { container, .. } if container == "b"));
    }
}
