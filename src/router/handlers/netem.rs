//! Netem endpoint adapters: one per variant, sharing target resolution,
//! interface/IP/port parsing, and sidecar image defaults.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use ipnet::IpNet;
use serde::Deserialize;

use crate::chaos::commands::netem::{parse_cidrs, Corrupt, Delay, Duplicate, Loss, LossGemodel, Rate};
use crate::chaos::container::Container;
use crate::chaos::interval::parse_duration;
use crate::chaos::runner::Runner;
use crate::error::DaemonError;

use super::{ok_job, resolve, CommonParams, JobResponse};
use crate::router::AppState;

/// Fields shared by every netem variant beyond target selection.
#[derive(Debug, Deserialize)]
pub struct NetemCommon {
    #[serde(flatten)]
    pub common: CommonParams,
    pub iface: String,
    pub duration: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub port: Option<u16>,
    pub image: Option<String>,
    pub pull: Option<bool>,
}

struct Resolved {
    targets: Vec<Container>,
    interval: Duration,
    duration: Duration,
    ips: Vec<IpNet>,
}

async fn resolve_netem(state: &AppState, common: &NetemCommon) -> Result<Resolved, DaemonError> {
    let (targets, interval) = resolve(state, &common.common).await?;
    let duration = parse_duration(&common.duration, interval)?;
    let ips = parse_cidrs(&common.ips)?;
    Ok(Resolved { targets, interval, duration, ips })
}

fn image_and_pull(state: &AppState, common: &NetemCommon) -> (String, bool) {
    (
        common.image.clone().unwrap_or_else(|| state.config.netem.default_image.clone()),
        common.pull.unwrap_or(state.config.netem.pull_by_default),
    )
}

#[derive(Debug, Deserialize)]
pub struct DelayRequest {
    #[serde(flatten)]
    pub netem: NetemCommon,
    pub time_ms: u64,
    #[serde(default)]
    pub jitter_ms: u64,
    #[serde(default)]
    pub correlation: f64,
    pub distribution: Option<String>,
}

pub async fn delay(
    State(state): State<AppState>,
    Json(req): Json<DelayRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let resolved = resolve_netem(&state, &req.netem).await?;
    let (image, pull) = image_and_pull(&state, &req.netem);
    let command = Arc::new(Delay::build(
        resolved.targets,
        req.netem.iface,
        req.time_ms,
        req.jitter_ms,
        req.correlation,
        req.distribution,
        resolved.ips,
        req.netem.port,
        resolved.duration,
        image,
        pull,
        req.netem.common.dry_run,
    )?);
    let id = Runner::spawn(command, state.client.clone(), resolved.interval, state.registry.clone(), state.teardown_token.clone());
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct LossRequest {
    #[serde(flatten)]
    pub netem: NetemCommon,
    pub percentage: f64,
    #[serde(default)]
    pub correlation: f64,
}

pub async fn loss(
    State(state): State<AppState>,
    Json(req): Json<LossRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let resolved = resolve_netem(&state, &req.netem).await?;
    let (image, pull) = image_and_pull(&state, &req.netem);
    let command = Arc::new(Loss::build(
        resolved.targets,
        req.netem.iface,
        req.percentage,
        req.correlation,
        resolved.ips,
        req.netem.port,
        resolved.duration,
        image,
        pull,
        req.netem.common.dry_run,
    )?);
    let id = Runner::spawn(command, state.client.clone(), resolved.interval, state.registry.clone(), state.teardown_token.clone());
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct LossGemodelRequest {
    #[serde(flatten)]
    pub netem: NetemCommon,
    pub pg: f64,
    #[serde(default)]
    pub pb: f64,
    #[serde(default, rename = "one_h")]
    pub one_h: f64,
    #[serde(default, rename = "one_k")]
    pub one_k: f64,
}

pub async fn loss_gemodel(
    State(state): State<AppState>,
    Json(req): Json<LossGemodelRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let resolved = resolve_netem(&state, &req.netem).await?;
    let (image, pull) = image_and_pull(&state, &req.netem);
    let command = Arc::new(LossGemodel::build(
        resolved.targets,
        req.netem.iface,
        req.pg,
        req.pb,
        req.one_h,
        req.one_k,
        resolved.ips,
        req.netem.port,
        resolved.duration,
        image,
        pull,
        req.netem.common.dry_run,
    )?);
    let id = Runner::spawn(command, state.client.clone(), resolved.interval, state.registry.clone(), state.teardown_token.clone());
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(flatten)]
    pub netem: NetemCommon,
    pub rate: String,
    pub packet_overhead: Option<i64>,
    pub cell_size: Option<i64>,
    pub cell_overhead: Option<i64>,
}

pub async fn rate(
    State(state): State<AppState>,
    Json(req): Json<RateRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let resolved = resolve_netem(&state, &req.netem).await?;
    let (image, pull) = image_and_pull(&state, &req.netem);
    let command = Arc::new(Rate::build(
        resolved.targets,
        req.netem.iface,
        req.rate,
        req.packet_overhead,
        req.cell_size,
        req.cell_overhead,
        resolved.ips,
        req.netem.port,
        resolved.duration,
        image,
        pull,
        req.netem.common.dry_run,
    )?);
    let id = Runner::spawn(command, state.client.clone(), resolved.interval, state.registry.clone(), state.teardown_token.clone());
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct CorruptRequest {
    #[serde(flatten)]
    pub netem: NetemCommon,
    pub percentage: f64,
    #[serde(default)]
    pub correlation: f64,
}

pub async fn corrupt(
    State(state): State<AppState>,
    Json(req): Json<CorruptRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let resolved = resolve_netem(&state, &req.netem).await?;
    let (image, pull) = image_and_pull(&state, &req.netem);
    let command = Arc::new(Corrupt::build(
        resolved.targets,
        req.netem.iface,
        req.percentage,
        req.correlation,
        resolved.ips,
        req.netem.port,
        resolved.duration,
        image,
        pull,
        req.netem.common.dry_run,
    )?);
    let id = Runner::spawn(command, state.client.clone(), resolved.interval, state.registry.clone(), state.teardown_token.clone());
    Ok(ok_job(id))
}

#[derive(Debug, Deserialize)]
pub struct DuplicateRequest {
    #[serde(flatten)]
    pub netem: NetemCommon,
    pub percentage: f64,
    #[serde(default)]
    pub correlation: f64,
}

pub async fn duplicate(
    State(state): State<AppState>,
    Json(req): Json<DuplicateRequest>,
) -> Result<(StatusCode, Json<JobResponse>), DaemonError> {
    let resolved = resolve_netem(&state, &req.netem).await?;
    let (image, pull) = image_and_pull(&state, &req.netem);
    let command = Arc::new(Duplicate::build(
        resolved.targets,
        req.netem.iface,
        req.percentage,
        req.correlation,
        resolved.ips,
        req.netem.port,
        resolved.duration,
        image,
        pull,
        req.netem.common.dry_run,
    )?);
    let id = Runner::spawn(command, state.client.clone(), resolved.interval, state.registry.clone(), state.teardown_token.clone());
    Ok(ok_job(id))
}
