//! Kill/Pause/Stop/Remove endpoint adapters: parse the request, resolve
//! targets, build the command, and hand it to the runner.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::chaos::commands::{Kill, Pause, Remove, Stop};
use crate::chaos::interval::parse_duration;
use crate::chaos::runner::Runner;
use crate::error::DaemonError;

use super::{ok_job, resolve, CommonParams, JobResponse};
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct KillRequest {
    #[serde(flatten)]
    pub common: CommonParams,
    #[serde(default)]
    pub signal: String,
}

pub async fn kill(
    State(state): State<AppState>,
    Json(req): Json<KillRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let (targets, interval) = resolve(&state, &req.common).await?;
    let command = Arc::new(Kill::new(targets, req.signal, req.common.dry_run)?);
    let id = Runner::spawn(
        command,
        state.client.clone(),
        interval,
        state.registry.clone(),
        state.teardown_token.clone(),
    );
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct PauseRequest {
    #[serde(flatten)]
    pub common: CommonParams,
    #[serde(default)]
    pub duration: String,
}

pub async fn pause(
    State(state): State<AppState>,
    Json(req): Json<PauseRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let (targets, interval) = resolve(&state, &req.common).await?;
    let duration = parse_duration(&req.duration, interval)?;
    let command = Arc::new(Pause::new(targets, duration, req.common.dry_run));
    let id = Runner::spawn(
        command,
        state.client.clone(),
        interval,
        state.registry.clone(),
        state.teardown_token.clone(),
    );
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct StopRequest {
    #[serde(flatten)]
    pub common: CommonParams,
    #[serde(default)]
    pub duration: String,
    #[serde(default = "default_wait_seconds", rename = "wait-time")]
    pub wait_seconds: i64,
    #[serde(default)]
    pub restart: bool,
}

fn default_wait_seconds() -> i64 {
    crate::chaos::commands::stop::DEFAULT_WAIT_SECONDS
}

pub async fn stop(
    State(state): State<AppState>,
    Json(req): Json<StopRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let (targets, interval) = resolve(&state, &req.common).await?;
    let duration = parse_duration(&req.duration, interval)?;
    let command = Arc::new(Stop::new(targets, duration, req.wait_seconds, req.restart, req.common.dry_run));
    let id = Runner::spawn(
        command,
        state.client.clone(),
        interval,
        state.registry.clone(),
        state.teardown_token.clone(),
    );
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    #[serde(flatten)]
    pub common: CommonParams,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub links: bool,
    #[serde(default)]
    pub volumes: bool,
}

pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<RemoveRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let (targets, interval) = resolve(&state, &req.common).await?;
    let command = Arc::new(Remove::new(targets, req.force, req.links, req.volumes, req.common.dry_run));
    let id = Runner::spawn(
        command,
        state.client.clone(),
        interval,
        state.registry.clone(),
        state.teardown_token.clone(),
    );
    Ok(ok_job(id))
}
