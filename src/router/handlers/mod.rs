//! HTTP request handlers for the chaos control surface.

pub mod control;
pub mod docker;
pub mod netem;

use std::time::Duration;

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::chaos::container::Container;
use crate::chaos::filter::{apply_random_pick, list_targets, Filter};
use crate::chaos::interval::parse_interval;
use crate::error::DaemonError;

use super::AppState;

/// Target selection and run-shape fields shared by every chaos endpoint.
#[derive(Debug, Deserialize)]
pub struct CommonParams {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub random: bool,
    /// Recurrence interval (`"10s"`, ...). Empty means one-shot.
    #[serde(default)]
    pub interval: String,
    #[serde(default, rename = "dry-run")]
    pub dry_run: bool,
}

/// Resolve `common`'s target set against the daemon's runtime client and
/// parse its recurrence interval.
pub(super) async fn resolve(
    state: &AppState,
    common: &CommonParams,
) -> Result<(Vec<Container>, Duration), DaemonError> {
    let filter = Filter::new(common.names.clone(), common.pattern.clone(), common.limit);
    let targets = list_targets(state.client.as_ref(), &filter).await?;
    let targets = apply_random_pick(targets, common.random);
    let interval = parse_interval(&common.interval)?;
    Ok((targets, interval))
}

#[derive(serde::Serialize)]
pub struct JobResponse {
    pub status: &'static str,
    pub job: String,
}

/// A background run was launched: `202 Accepted` with the job id.
pub(super) fn ok_job(id: String) -> (StatusCode, axum::Json<JobResponse>) {
    (StatusCode::ACCEPTED, axum::Json(JobResponse { status: "ok", job: id }))
}

pub(super) fn version_body() -> serde_json::Value {
    json!({ "version": env!("CARGO_PKG_VERSION") })
}
