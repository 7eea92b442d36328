//! Errors raised while building or running a dispatcher.

use arsa_authz::AuthzError;
use arsa_core::RequestId;
use arsa_router::PatternError;
use thiserror::Error;

/// Errors raised by [`App::build`](crate::App::build).
#[derive(Debug, Error)]
pub enum BuildError {
    /// The route was amended but never given a pattern.
    #[error("route '{handler}' has no pattern")]
    MissingPattern {
        /// Handler identity.
        handler: String,
    },

    /// The route was amended but never given a handler function.
    #[error("route '{handler}' has no handler function")]
    MissingHandler {
        /// Handler identity.
        handler: String,
    },

    /// The pattern or method set is invalid.
    #[error("route '{handler}': {source}")]
    InvalidPattern {
        /// Handler identity.
        handler: String,
        /// Underlying pattern error.
        #[source]
        source: PatternError,
    },

    /// The declared content type is not a MIME type.
    #[error("route '{handler}': invalid content type '{content_type}'")]
    InvalidContentType {
        /// Handler identity.
        handler: String,
        /// The rejected value.
        content_type: String,
    },

    /// A schema field uses a name the dispatcher reserves.
    #[error("route '{handler}': argument name '{name}' is reserved")]
    ReservedArgument {
        /// Handler identity.
        handler: String,
        /// The reserved name.
        name: String,
    },
}

/// A fault that the dispatcher does not turn into a response.
///
/// Only unexpected application errors end up here; routing, schema and
/// declared application faults always produce a [`Response`](arsa_core::Response).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The handler (or a middleware) failed with an unhandled error.
    #[error("unhandled application fault in '{handler}' (request {request_id}): {source}")]
    Application {
        /// Matched handler, or the middleware name when routing was not reached.
        handler: String,
        /// Invocation request ID.
        request_id: RequestId,
        /// The application error.
        #[source]
        source: anyhow::Error,
    },
}

/// Errors raised at the provider event boundary.
#[derive(Debug, Error)]
pub enum LambdaError {
    /// The event JSON does not have the proxy event shape.
    #[error("invalid proxy event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    /// The event declares a base64 body that does not decode.
    #[error("invalid base64 body: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The form-encoded body does not decode.
    #[error("invalid form body: {0}")]
    InvalidForm(#[from] serde_urlencoded::de::Error),

    /// The HTTP method is not a valid token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// The dispatcher propagated an application fault.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The authorizer failed.
    #[error(transparent)]
    Authz(#[from] AuthzError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display() {
        let err = BuildError::ReservedArgument {
            handler: "search".to_string(),
            name: "query".to_string(),
        };
        assert_eq!(err.to_string(), "route 'search': argument name 'query' is reserved");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        use std::error::Error as _;

        let err = BuildError::InvalidPattern {
            handler: "get_user".to_string(),
            source: PatternError::UnknownConverter("date".to_string()),
        };
        assert!(err.to_string().contains("unknown converter 'date'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::Application {
            handler: "boom".to_string(),
            request_id: RequestId::new(),
            source: anyhow::anyhow!("database unreachable"),
        };
        let text = err.to_string();
        assert!(text.contains("'boom'"));
        assert!(text.contains("database unreachable"));
    }
}
