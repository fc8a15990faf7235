//! Request-level failures of the orchestrator.

use axum::http::StatusCode;
use thiserror::Error;

use stage_client::{Stage, StageError};

/// Why a `find_recipes` run produced no response.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Rejected before any stage ran
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A single-call stage failed in transport, status or decoding
    #[error("upstream error: {0}")]
    Upstream(StageError),

    /// A single-call stage did not answer within its timeout
    #[error("upstream timeout: {0}")]
    Timeout(StageError),

    /// A stage succeeded but left nothing to continue with
    #[error("{stage}: {reason}")]
    NothingFound { stage: Stage, reason: &'static str },
}

impl OrchestratorError {
    pub fn nothing_found(stage: Stage, reason: &'static str) -> Self {
        OrchestratorError::NothingFound { stage, reason }
    }

    /// Stage that caused the failure, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            OrchestratorError::InvalidRequest(_) => None,
            OrchestratorError::Upstream(e) | OrchestratorError::Timeout(e) => Some(e.stage()),
            OrchestratorError::NothingFound { stage, .. } => Some(*stage),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            OrchestratorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::Upstream(_) => StatusCode::BAD_GATEWAY,
            OrchestratorError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OrchestratorError::NothingFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl From<StageError> for OrchestratorError {
    fn from(err: StageError) -> Self {
        if err.is_timeout() {
            OrchestratorError::Timeout(err)
        } else {
            OrchestratorError::Upstream(err)
        }
    }
}
