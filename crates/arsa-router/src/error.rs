//! Router error types.

use thiserror::Error;

/// Errors raised while declaring a route pattern or its methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Patterns must be absolute.
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    /// A segment mixes literal text and placeholder syntax, or has an empty name.
    #[error("malformed pattern segment '{0}'")]
    MalformedSegment(String),

    /// The same variable name appears twice in one pattern.
    #[error("variable '{0}' is declared more than once")]
    DuplicateVariable(String),

    /// A `path` converter was followed by further segments.
    #[error("path variable '{0}' must be the last segment")]
    PathNotLast(String),

    /// The converter name is not known.
    #[error("unknown converter '{0}'")]
    UnknownConverter(String),

    /// A method name is not a valid HTTP method token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// A route was declared with an explicitly empty method set.
    #[error("a route must allow at least one method")]
    EmptyMethods,
}

/// Outcome of a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No pattern structurally matches the path.
    #[error("no route matches the requested path")]
    NotFound,

    /// At least one pattern matches the path but none allows the method.
    #[error("method not allowed; allowed: {}", allowed.allow_header())]
    MethodNotAllowed {
        /// Union of the methods declared by the matching patterns.
        allowed: crate::MethodSet,
    },
}
