//! Error types for the authorization crate.

use thiserror::Error;

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Errors that can occur while building an authorization decision.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthzError {
    /// The method ARN has fewer than two `/` separators.
    #[error("malformed method ARN: {0}")]
    MalformedArn(String),

    /// The authorizer event could not be read.
    #[error("invalid authorizer event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    /// The application decision function failed.
    #[error("authorizer decision failed: {0}")]
    Decision(#[from] anyhow::Error),
}
