//! Remove: sequentially remove each target, stopping at the first failure.
//! No teardown - a removed container cannot be un-removed.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::chaos::client::RuntimeClient;
use crate::chaos::command::ChaosCommand;
use crate::chaos::container::Container;
use crate::chaos::error::{ChaosError, ChaosResult};

pub struct Remove {
    pub targets: Vec<Container>,
    pub force: bool,
    pub links: bool,
    pub volumes: bool,
    pub dry_run: bool,
}

impl Remove {
    pub fn new(targets: Vec<Container>, force: bool, links: bool, volumes: bool, dry_run: bool) -> Self {
        Remove { targets, force, links, volumes, dry_run }
    }
}

#[async_trait]
impl ChaosCommand for Remove {
    fn kind(&self) -> &'static str {
        "remove"
    }

    async fn run(
        &self,
        client: &dyn RuntimeClient,
        _run_token: &CancellationToken,
        _teardown_token: &CancellationToken,
    ) -> ChaosResult<()> {
        for target in &self.targets {
            debug!(container = %target.name, "removing container");
            client
                .remove_container(target, self.force, self.links, self.volumes, self.dry_run)
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
    async fn removes_all_targets_in_order() {
        let targets = containers(&["a", "b"]);
        let client = MockClient::with_containers(vec![]);
        let cmd = Remove::new(targets, true, false, false, false);
        cmd.run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec![
                Call::Remove { container: "a".into() },
                Call::Remove { container: "b".into() },
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let targets = containers(&["a", "b", "c"]);
        let client = MockClient::with_containers(vec![]);
        client.fail_container("a", "boom");
        let cmd = Remove::new(targets, true, false, false, false);
        let err = cmd
            .run(&client, &CancellationToken::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ChaosError::ActionFailure { container, .. } if container == "a"));
        assert_eq!(client.calls(), vec![Call::Remove { container: "a".into() }]);
    }
}
