//! Test-only [`RuntimeClient`] mock shared by the chaos engine's unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ipnet::IpNet;

use super::client::RuntimeClient;
use super::container::Container;

/// Build containers named after `names`, in order, with deterministic ids.
pub fn containers(names: &[&str]) -> Vec<Container> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| Container::new(format!("id-{i}"), n.to_string()))
        .collect()
}

/// A single recorded call against the mock, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Kill { container: String, signal: String },
    Pause { container: String },
    Unpause { container: String },
    Stop { container: String },
    Start { container: String },
    Remove { container: String },
    Netem { container: String, iface: String },
}

/// Fixed set of containers plus an optional per-name failure, recording every
/// call it receives so tests can assert both outcome and call order.
#[derive(Default)]
pub struct MockClient {
    containers: Vec<Container>,
    fail_on: Mutex<HashMap<String, String>>,
    fail_teardown_on: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn with_containers(containers: Vec<Container>) -> Self {
        MockClient {
            containers,
            fail_on: Mutex::new(HashMap::new()),
            fail_teardown_on: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every action against `name` fail with `message`.
    pub fn fail_container(&self, name: &str, message: &str) {
        self.fail_on
            .lock()
            .unwrap()
            .insert(name.to_string(), message.to_string());
    }

    /// Make only the teardown call (unpause/start) against `name` fail,
    /// independent of whether its primary action (pause/stop) succeeds.
    pub fn fail_teardown(&self, name: &str, message: &str) {
        self.fail_teardown_on
            .lock()
            .unwrap()
            .insert(name.to_string(), message.to_string());
    }

    fn maybe_fail_teardown(&self, container: &Container) -> anyhow::Result<()> {
        if let Some(msg) = self.fail_teardown_on.lock().unwrap().get(&container.name) {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn maybe_fail(&self, container: &Container) -> anyhow::Result<()> {
        if let Some(msg) = self.fail_on.lock().unwrap().get(&container.name) {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RuntimeClient for MockClient {
    async fn list_containers(&self) -> anyhow::Result<Vec<Container>> {
        Ok(self.containers.clone())
    }

    async fn kill_container(&self, container: &Container, signal: &str, _dry_run: bool) -> anyhow::Result<()> {
        self.record(Call::Kill {
            container: container.name.clone(),
            signal: signal.to_string(),
        });
        self.maybe_fail(container)
    }

    async fn pause_container(&self, container: &Container, _dry_run: bool) -> anyhow::Result<()> {
        self.record(Call::Pause {
            container: container.name.clone(),
        });
        self.maybe_fail(container)
    }

    async fn unpause_container(&self, container: &Container, _dry_run: bool) -> anyhow::Result<()> {
        self.record(Call::Unpause {
            container: container.name.clone(),
        });
        self.maybe_fail(container)?;
        self.maybe_fail_teardown(container)
    }

    async fn stop_container(&self, container: &Container, _wait_seconds: i64, _dry_run: bool) -> anyhow::Result<()> {
        self.record(Call::Stop {
            container: container.name.clone(),
        });
        self.maybe_fail(container)
    }

    async fn start_container(&self, container: &Container, _dry_run: bool) -> anyhow::Result<()> {
        self.record(Call::Start {
            container: container.name.clone(),
        });
        self.maybe_fail(container)?;
        self.maybe_fail_teardown(container)
    }

    async fn remove_container(
        &self,
        container: &Container,
        _force: bool,
        _links: bool,
        _volumes: bool,
        _dry_run: bool,
    ) -> anyhow::Result<()> {
        self.record(Call::Remove {
            container: container.name.clone(),
        });
        self.maybe_fail(container)
    }

    async fn apply_netem(
        &self,
        container: &Container,
        iface: &str,
        _args: &[String],
        _ips: &[IpNet],
        _port: Option<u16>,
        _duration: Duration,
        _image: &str,
        _pull: bool,
        _dry_run: bool,
    ) -> anyhow::Result<()> {
        self.record(Call::Netem {
            container: container.name.clone(),
            iface: iface.to_string(),
        });
        self.maybe_fail(container)
    }
}
