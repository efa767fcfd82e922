//! Server command: run the chaos engine behind the HTTP control surface.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use chaosd::chaos::client::docker::DockerRuntimeClient;
use chaosd::chaos::client::RuntimeClient;
use chaosd::chaos::job::JobRegistry;
use chaosd::config::Configuration;
use chaosd::router::{self, AppState};

/// Grace period given to in-flight requests once a shutdown signal arrives.
/// Shorter than the upstream Wings daemon's 10s, since a chaos command
/// itself owns any longer-running teardown and is not bound by this window.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn run(config_path: &str, docker_socket_override: Option<String>) -> Result<()> {
    info!(path = config_path, "loading configuration");
    let mut config = Configuration::load(config_path)?;
    if let Some(socket) = docker_socket_override {
        config.docker.socket = socket;
    }
    let config = Arc::new(config);

    info!(host = %config.server.host, port = config.server.port, "configuration loaded");

    let client: Arc<dyn RuntimeClient> = if config.docker.socket.is_empty() {
        Arc::new(DockerRuntimeClient::connect_local()?)
    } else {
        Arc::new(DockerRuntimeClient::connect_socket(&config.docker.socket)?)
    };

    let registry = Arc::new(JobRegistry::new());
    let teardown_token = CancellationToken::new();

    let state = AppState {
        client,
        registry,
        config: config.clone(),
        teardown_token: teardown_token.clone(),
    };
    let app = router::build_router(state);

    let bind_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("invalid bind address");

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        warn!("received shutdown signal, draining requests");
        shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    info!(%bind_addr, "starting chaos daemon");
    axum_server::bind(bind_addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    // Jobs in flight at shutdown still own their teardown; this token is
    // process-lifetime and is never canceled.
    drop(teardown_token);

    info!("daemon stopped");
    Ok(())
}
