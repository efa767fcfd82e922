//! Runtime client capability interface and its `bollard` adapter.
//!
//! The chaos engine never talks to Docker directly: every command holds a
//! `Arc<dyn RuntimeClient>` and the engine is fully testable against a mock.

use std::time::Duration;

use async_trait::async_trait;
use ipnet::IpNet;

use super::container::Container;

/// Narrow capability interface the chaos engine requires of a container
/// runtime. Implementations are expected to be cheap to clone and safe for
/// concurrent use (the engine calls these from many tasks at once).
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// List all live containers, in runtime-defined (but stable-within-call)
    /// order.
    async fn list_containers(&self) -> anyhow::Result<Vec<Container>>;

    async fn kill_container(&self, container: &Container, signal: &str, dry_run: bool) -> anyhow::Result<()>;

    async fn pause_container(&self, container: &Container, dry_run: bool) -> anyhow::Result<()>;

    async fn unpause_container(&self, container: &Container, dry_run: bool) -> anyhow::Result<()>;

    async fn stop_container(&self, container: &Container, wait_seconds: i64, dry_run: bool) -> anyhow::Result<()>;

    async fn start_container(&self, container: &Container, dry_run: bool) -> anyhow::Result<()>;

    async fn remove_container(
        &self,
        container: &Container,
        force: bool,
        links: bool,
        volumes: bool,
        dry_run: bool,
    ) -> anyhow::Result<()>;

    /// Apply a netem traffic-control discipline to `container`'s `iface` for
    /// `duration`, then remove it. Teardown is this call's responsibility;
    /// the engine does not drive it separately.
    #[allow(clippy::too_many_arguments)]
    async fn apply_netem(
        &self,
        container: &Container,
        iface: &str,
        args: &[String],
        ips: &[IpNet],
        port: Option<u16>,
        duration: Duration,
        image: &str,
        pull: bool,
        dry_run: bool,
    ) -> anyhow::Result<()>;
}

pub mod docker {
    //! `bollard`-backed [`RuntimeClient`] talking to the local Docker daemon.

    use std::time::Duration;

    use async_trait::async_trait;
    use bollard::container::{
        KillContainerOptions, ListContainersOptions, RemoveContainerOptions, StartContainerOptions,
        StopContainerOptions,
    };
    use bollard::exec::CreateExecOptions;
    use bollard::models::HostConfig;
    use bollard::Docker;
    use futures_util::StreamExt;
    use ipnet::IpNet;
    use tracing::{debug, info, warn};

    use super::super::container::Container;
    use super::RuntimeClient;

    /// Default sidecar image used to drive `tc` inside the target
    /// container's network namespace, matching the upstream convention.
    pub const DEFAULT_NETEM_IMAGE: &str = "gaiadocker/iproute2";

    #[derive(Clone)]
    pub struct DockerRuntimeClient {
        client: Docker,
    }

    impl DockerRuntimeClient {
        pub fn connect_local() -> anyhow::Result<Self> {
            Ok(DockerRuntimeClient {
                client: Docker::connect_with_local_defaults()?,
            })
        }

        pub fn connect_socket(socket_path: &str) -> anyhow::Result<Self> {
            Ok(DockerRuntimeClient {
                client: Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION)?,
            })
        }

        /// Returns `false` (after logging intent) when `dry_run` should
        /// short-circuit the caller before any Docker call is made.
        fn should_proceed(dry_run: bool, container: &Container, action: &str) -> bool {
            if dry_run {
                info!(container = %container.name, action, "dry-run: skipping Docker call");
                false
            } else {
                true
            }
        }
    }

    #[async_trait]
    impl RuntimeClient for DockerRuntimeClient {
        async fn list_containers(&self) -> anyhow::Result<Vec<Container>> {
            let options = Some(ListContainersOptions::<String> {
                all: false,
                ..Default::default()
            });
            let summaries = self.client.list_containers(options).await?;

            Ok(summaries
                .into_iter()
                .map(|c| {
                    let id = c.id.unwrap_or_default();
                    let name = c
                        .names
                        .and_then(|n| n.first().cloned())
                        .unwrap_or_default()
                        .trim_start_matches('/')
                        .to_string();
                    Container {
                        id,
                        name,
                        image: c.image.unwrap_or_default(),
                        labels: c.labels.unwrap_or_default(),
                    }
                })
                .collect())
        }

        async fn kill_container(&self, container: &Container, signal: &str, dry_run: bool) -> anyhow::Result<()> {
            if !Self::should_proceed(dry_run, container, "kill") {
                return Ok(());
            }
            let options = KillContainerOptions { signal };
            match self.client.kill_container(&container.id, Some(options)).await {
                Ok(_) => Ok(()),
                Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => {
                    debug!(container = %container.name, "container not found for kill");
                    Ok(())
                }
                Err(bollard::errors::Error::DockerResponseServerError { status_code: 409, message }) => {
                    debug!(container = %container.name, message, "container not running for kill");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }

        async fn pause_container(&self, container: &Container, dry_run: bool) -> anyhow::Result<()> {
            if !Self::should_proceed(dry_run, container, "pause") {
                return Ok(());
            }
            self.client.pause_container(&container.id).await?;
            Ok(())
        }

        async fn unpause_container(&self, container: &Container, dry_run: bool) -> anyhow::Result<()> {
            if !Self::should_proceed(dry_run, container, "unpause") {
                return Ok(());
            }
            self.client.unpause_container(&container.id).await?;
            Ok(())
        }

        async fn stop_container(&self, container: &Container, wait_seconds: i64, dry_run: bool) -> anyhow::Result<()> {
            if !Self::should_proceed(dry_run, container, "stop") {
                return Ok(());
            }
            let options = StopContainerOptions { t: wait_seconds };
            self.client.stop_container(&container.id, Some(options)).await?;
            Ok(())
        }

        async fn start_container(&self, container: &Container, dry_run: bool) -> anyhow::Result<()> {
            if !Self::should_proceed(dry_run, container, "start") {
                return Ok(());
            }
            self.client
                .start_container(&container.id, None::<StartContainerOptions<String>>)
                .await?;
            Ok(())
        }

        async fn remove_container(
            &self,
            container: &Container,
            force: bool,
            links: bool,
            volumes: bool,
            dry_run: bool,
        ) -> anyhow::Result<()> {
            if !Self::should_proceed(dry_run, container, "remove") {
                return Ok(());
            }
            let options = RemoveContainerOptions {
                force,
                link: links,
                v: volumes,
            };
            self.client.remove_container(&container.id, Some(options)).await?;
            Ok(())
        }

        async fn apply_netem(
            &self,
            container: &Container,
            iface: &str,
            args: &[String],
            ips: &[IpNet],
            port: Option<u16>,
            duration: Duration,
            image: &str,
            pull: bool,
            dry_run: bool,
        ) -> anyhow::Result<()> {
            if dry_run {
                info!(container = %container.name, iface, ?args, "dry-run: skipping netem apply");
                return Ok(());
            }

            if pull {
                let opts = Some(bollard::image::CreateImageOptions {
                    from_image: image,
                    ..Default::default()
                });
                let mut stream = self.client.create_image(opts, None, None);
                while let Some(result) = stream.next().await {
                    if let Err(e) = result {
                        warn!(error = %e, image, "failed to pull netem sidecar image");
                    }
                }
            }

            let netns = format!("container:{}", container.id);
            let host_config = HostConfig {
                network_mode: Some(netns),
                cap_add: Some(vec!["NET_ADMIN".into(), "NET_RAW".into()]),
                auto_remove: Some(true),
                ..Default::default()
            };

            let mut tc_args: Vec<String> = vec!["qdisc".into(), "add".into(), "dev".into(), iface.into(), "root".into(), "netem".into()];
            tc_args.extend(args.iter().cloned());
            if let Some(p) = port {
                tc_args.push("filter-port".into());
                tc_args.push(p.to_string());
            }
            if !ips.is_empty() {
                tc_args.push("filter-ips".into());
                tc_args.extend(ips.iter().map(|ip| ip.to_string()));
            }

            let config = bollard::container::Config {
                image: Some(image.to_string()),
                cmd: Some(std::iter::once("tc".to_string()).chain(tc_args).collect()),
                host_config: Some(host_config),
                ..Default::default()
            };

            let name = format!("chaosd-netem-{}", uuid_suffix());
            let created = self
                .client
                .create_container(
                    Some(bollard::container::CreateContainerOptions {
                        name: name.clone(),
                        platform: None,
                    }),
                    config,
                )
                .await?;

            self.client
                .start_container(&created.id, None::<StartContainerOptions<String>>)
                .await?;

            debug!(container = %container.name, sidecar = %name, ?duration, "netem sidecar started, awaiting teardown");

            // Teardown: remove the root qdisc once the duration elapses. The
            // sidecar's own CMD exits after applying the discipline, so we
            // schedule the `tc qdisc del` as a second exec once time is up.
            tokio::time::sleep(duration).await;

            let del_args = vec![
                "tc".to_string(),
                "qdisc".to_string(),
                "del".to_string(),
                "dev".to_string(),
                iface.to_string(),
                "root".to_string(),
            ];
            if let Ok(exec) = self
                .client
                .create_exec(
                    &created.id,
                    CreateExecOptions {
                        cmd: Some(del_args),
                        attach_stdout: Some(true),
                        attach_stderr: Some(true),
                        ..Default::default()
                    },
                )
                .await
            {
                let _ = self.client.start_exec(&exec.id, None).await;
            }

            let _ = self
                .client
                .remove_container(&created.id, Some(RemoveContainerOptions { force: true, ..Default::default() }))
                .await;

            Ok(())
        }
    }

    fn uuid_suffix() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        format!("{:x}", nanos)
    }
}
