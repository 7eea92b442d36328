//! Core error types.

use thiserror::Error;

/// Errors raised when reaching the invocation-scoped [`crate::RequestContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Called outside of a dispatch.
    #[error("working outside of request context")]
    NoActiveContext,

    /// The context is already borrowed further up the call stack.
    #[error("request context is already borrowed")]
    AlreadyBorrowed,
}
