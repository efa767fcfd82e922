//! Outer error type for the HTTP control surface: wraps [`ChaosError`] and
//! maps it to a status code and JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chaos::error::ChaosError;

#[derive(Error, Debug)]
pub enum DaemonError {
    #[error(transparent)]
    Chaos(#[from] ChaosError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DaemonError {
    pub fn internal(message: impl Into<String>) -> Self {
        DaemonError::Internal(message.into())
    }
}

impl IntoResponse for DaemonError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DaemonError::Chaos(ChaosError::InvalidParameter(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            DaemonError::Chaos(ChaosError::BadRequest(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            DaemonError::Chaos(ChaosError::NotFound) => {
                (StatusCode::NOT_FOUND, ChaosError::NotFound.to_string())
            }
            DaemonError::Chaos(e @ ChaosError::TargetResolution(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            DaemonError::Chaos(e @ ChaosError::ActionFailure { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            DaemonError::Chaos(e @ ChaosError::TeardownFailure { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            DaemonError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;
