//! Test error types.

use arsa::{DispatchError, LambdaError};
use thiserror::Error;

/// Errors that can occur during testing.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// A header name or value is invalid
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Response body was not what the caller asked for
    #[error("body read error: {0}")]
    BodyRead(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dispatcher propagated an unhandled application fault
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The proxy event boundary rejected the invocation
    #[error(transparent)]
    Lambda(#[from] LambdaError),
}

impl TestError {
    /// Returns true when the handler failed with an unhandled fault.
    #[must_use]
    pub fn is_unhandled(&self) -> bool {
        matches!(
            self,
            Self::Dispatch(_) | Self::Lambda(LambdaError::Dispatch(_))
        )
    }
}
