//! HTTP control surface: the same routes the CLI drives one-shot, exposed
//! as a daemon.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use tokio_util::sync::CancellationToken;

use crate::chaos::client::RuntimeClient;
use crate::chaos::job::JobRegistry;
use crate::config::Configuration;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runtime client every command acts through.
    pub client: Arc<dyn RuntimeClient>,

    /// Registry of in-flight jobs, for the cancel endpoint.
    pub registry: Arc<JobRegistry>,

    /// Daemon configuration (netem defaults, etc).
    pub config: Arc<Configuration>,

    /// Process-lifetime token passed to every spawned job so its teardown
    /// always runs, independent of that job's own cancellation.
    pub teardown_token: CancellationToken,
}

/// Build the HTTP router with all chaos routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/docker/kill", post(handlers::docker::kill))
        .route("/docker/pause", post(handlers::docker::pause))
        .route("/docker/stop", post(handlers::docker::stop))
        .route("/docker/remove", post(handlers::docker::remove))
        .route("/netem/delay", post(handlers::netem::delay))
        .route("/netem/loss", post(handlers::netem::loss))
        .route("/netem/loss-gemodel", post(handlers::netem::loss_gemodel))
        .route("/netem/rate", post(handlers::netem::rate))
        .route("/netem/corrupt", post(handlers::netem::corrupt))
        .route("/netem/duplicate", post(handlers::netem::duplicate))
        .route("/cancel", get(handlers::control::cancel))
        .route("/version", get(handlers::control::version))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
