//! Typed errors for the chaos execution engine.

use thiserror::Error;

/// Error taxonomy for the chaos engine, kept narrow so the HTTP and CLI
/// boundaries can each map it to their own surface (status code / exit code).
#[derive(Error, Debug)]
pub enum ChaosError {
    /// Construction-time validation failure (signal, regex, CIDR, probability
    /// range, interface name, duration >= interval).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The runtime client failed to list containers for a filter.
    #[error("failed to list containers: {0}")]
    TargetResolution(String),

    /// The runtime client failed to apply an action to a specific container.
    #[error("action failed for container {container}: {source}")]
    ActionFailure { container: String, source: String },

    /// Cleanup (unpause/start/remove qdisc) of a previously affected
    /// container failed.
    #[error("teardown failed for container {container}: {source}")]
    TeardownFailure { container: String, source: String },

    /// Cancel request for an unknown job id.
    #[error("cannot find chaos job with specified id")]
    NotFound,

    /// Missing or unparseable request body / CLI argument.
    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type ChaosResult<T> = std::result::Result<T, ChaosError>;

impl ChaosError {
    pub fn action(container: impl Into<String>, source: impl std::fmt::Display) -> Self {
        ChaosError::ActionFailure {
            container: container.into(),
            source: source.to_string(),
        }
    }

    pub fn teardown(container: impl Into<String>, source: impl std::fmt::Display) -> Self {
        ChaosError::TeardownFailure {
            container: container.into(),
            source: source.to_string(),
        }
    }
}
