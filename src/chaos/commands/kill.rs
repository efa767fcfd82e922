//! Kill: send a signal to each target, sequentially, stopping at first
//! failure.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::chaos::client::RuntimeClient;
use crate::chaos::command::ChaosCommand;
use crate::chaos::container::Container;
use crate::chaos::error::{ChaosError, ChaosResult};
use crate::chaos::signal::{is_valid_signal, DEFAULT_KILL_SIGNAL};

pub struct Kill {
    pub targets: Vec<Container>,
    pub signal: String,
    pub dry_run: bool,
}

impl Kill {
    pub fn new(targets: Vec<Container>, signal: impl Into<String>, dry_run: bool) -> ChaosResult<Self> {
        let signal = signal.into();
        let signal = if signal.is_empty() { DEFAULT_KILL_SIGNAL.to_string() } else { signal };
        if !is_valid_signal(&signal) {
            return Err(ChaosError::InvalidParameter(format!("unknown signal '{signal}'")));
        }
        Ok(Kill { targets, signal, dry_run })
    }
}

#[async_trait]
impl ChaosCommand for Kill {
    fn kind(&self) -> &'static str {
        "kill"
    }

    async fn run(
        &self,
        client: &dyn RuntimeClient,
        _run_token: &CancellationToken,
        _teardown_token: &CancellationToken,
    ) -> ChaosResult<()> {
        for target in &self.targets {
            debug!(container = %target.name, signal = %self.signal, "killing container");
            client
                .kill_container(target, &self.signal, self.dry_run)
                .await
                .map_err(|e| ChaosError::action(&target.name, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaos::testutil::{containers, Call, MockClient};

    #[tokio::test]
    async fn kills_targets_in_order() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        let cmd = Kill::new(targets, "SIGTERM", false).unwrap();
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Kill { container: "a".into(), signal: "SIGTERM".into() },
                Call::Kill { container: "b".into(), signal: "SIGTERM".into() },
                Call::Kill { container: "c".into(), signal: "SIGTERM".into() },
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        client.fail_container("b", "boom");
        let cmd = Kill::new(targets, "SIGKILL", false).unwrap();
        let err = cmd
            .run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ChaosError::ActionFailure { container, .. } if container == "b"));
        assert_eq!(
            client.calls(),
            vec![
                Call::Kill { container: "a".into(), signal: "SIGKILL".into() },
                Call::Kill { container: "b".into(), signal: "SIGKILL".into() },
            ]
        );
    }

    #[tokio::test]
    async fn kill_by_names_in_target_order() {
        use crate::chaos::filter::{list_targets, Filter};

        let client = MockClient::with_containers(containers(&["c1", "c2", "c3"]));
        let filter = Filter::new(vec!["c1".into(), "c2".into(), "c3".into()], String::new(), 0);
        let targets = list_targets(&client, &filter).await.unwrap();
        let cmd = Kill::new(targets, "SIGKILL", false).unwrap();
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Kill { container: "c1".into(), signal: "SIGKILL".into() },
                Call::Kill { container: "c2".into(), signal: "SIGKILL".into() },
                Call::Kill { container: "c3".into(), signal: "SIGKILL".into() },
            ]
        );
    }

    #[tokio::test]
    async fn kill_by_pattern_with_limit() {
        use crate::chaos::filter::{list_targets, Filter};

        let client = MockClient::with_containers(containers(&["c1", "c2", "c3"]));
        let filter = Filter::new(vec![], "re2:^c".into(), 2);
        let targets = list_targets(&client, &filter).await.unwrap();
        let cmd = Kill::new(targets, "SIGSTOP", false).unwrap();
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Kill { container: "c1".into(), signal: "SIGSTOP".into() },
                Call::Kill { container: "c2".into(), signal: "SIGSTOP".into() },
            ]
        );
    }

    #[test]
    fn empty_signal_defaults_to_sigkill() {
        let cmd = Kill::new(vec![], "", false).unwrap();
        assert_eq!(cmd.signal, "SIGKILL");
    }

    #[test]
    fn unknown_signal_rejected() {
        assert!(Kill::new(vec![], "SIGBANANA", false).is_err());
    }
}
