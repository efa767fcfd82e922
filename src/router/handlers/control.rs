//! Job cancellation and version endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::chaos::error::ChaosError;
use crate::error::DaemonError;

use super::version_body;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct CancelQuery {
    pub job: Option<String>,
}

/// Cancel a running job by id. 400 if `job` is missing, 404 (mapped from
/// [`ChaosError::NotFound`]) if it's unknown or already finished.
pub async fn cancel(
    State(state): State<AppState>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<serde_json::Value>, DaemonError> {
    let id = query
        .job
        .ok_or_else(|| ChaosError::BadRequest("missing 'job' query parameter".into()))?;
    state.registry.cancel(&id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn version() -> Json<serde_json::Value> {
    Json(version_body())
}
