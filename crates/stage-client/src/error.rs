//! Error types for calls to pipeline collaborators.

use std::time::Duration;

use thiserror::Error;

use crate::stage::Stage;

/// Longest slice of a failed response body kept in an error.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors that can occur when calling a stage collaborator
#[derive(Error, Debug)]
pub enum StageError {
    /// Connection refused, DNS failure, reset mid-response
    #[error("{stage} transport error: {message}")]
    Transport { stage: Stage, message: String },

    /// No response within the stage timeout
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: Stage, after: Duration },

    /// Collaborator answered with a non-success status
    #[error("{stage} returned HTTP {status}: {body}")]
    Status {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// Body did not match the declared contract
    #[error("{stage} returned an unreadable body: {reason}")]
    Decode { stage: Stage, reason: String },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Transport { stage, .. }
            | StageError::Timeout { stage, .. }
            | StageError::Status { stage, .. }
            | StageError::Decode { stage, .. } => *stage,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StageError::Timeout { .. })
    }

    /// Whether a repeat of the same call could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StageError::Transport { .. } | StageError::Timeout { .. } => true,
            StageError::Status { status, .. } => *status >= 500,
            StageError::Decode { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(stage: Stage, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StageError::Timeout {
                stage,
                after: timeout,
            }
        } else {
            StageError::Transport {
                stage,
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn status(stage: Stage, status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(BODY_EXCERPT_LEN) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        StageError::Status {
            stage,
            status,
            body,
        }
    }
}

pub type Result<T> = std::result::Result<T, StageError>;
