//! Fault taxonomy and its mapping to HTTP statuses and bodies.

use arsa_router::MethodSet;
use arsa_schema::SchemaError;
use http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

const NOT_FOUND_DESCRIPTION: &str = "The requested URL was not found on the server. If you \
     entered the URL manually please check your spelling and try again.";
const METHOD_NOT_ALLOWED_DESCRIPTION: &str = "The method is not allowed for the requested URL.";

/// A failure produced while dispatching an invocation.
///
/// Every variant except [`Fault::Unhandled`] is mapped to a structured
/// response by the dispatcher. `Unhandled` carries unexpected application
/// errors that must reach the host as a fatal condition.
#[derive(Debug, Error)]
pub enum Fault {
    /// No route matches the path.
    #[error("route not found")]
    RouteNotFound,

    /// A route matches the path but not the method.
    #[error("method not allowed (allowed: {allowed})")]
    MethodNotAllowed {
        /// Methods the matching routes accept.
        allowed: MethodSet,
    },

    /// The JSON body could not be parsed.
    #[error("JSON body was malformed: {reason}")]
    MalformedBody {
        /// Parser message.
        reason: String,
    },

    /// The body exceeds the configured limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Arguments failed schema validation.
    #[error(transparent)]
    InvalidArgument(#[from] SchemaError),

    /// The handler asked for a redirect.
    #[error("redirect to {}", .0.location())]
    Redirect(Redirect),

    /// A fault declared by the application.
    #[error("{}: {}", .0.name(), .0.description())]
    Registered(AppFault),

    /// A built-in HTTP fault raised by the handler.
    #[error("{}", .0.name())]
    Http(HttpFault),

    /// Any other application error. Never turned into a response.
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl Fault {
    /// Wraps an arbitrary error as an unhandled fault.
    pub fn unhandled(error: impl Into<anyhow::Error>) -> Self {
        Self::Unhandled(error.into())
    }

    /// Creates a malformed body fault.
    pub fn malformed_body(reason: impl std::fmt::Display) -> Self {
        Self::MalformedBody {
            reason: reason.to_string(),
        }
    }

    /// Returns true for faults that must propagate to the host.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unhandled(_))
    }

    /// HTTP status for the fault.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedBody { .. } | Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Redirect(redirect) => redirect.status(),
            Self::Registered(fault) => fault.status(),
            Self::Http(fault) => fault.status(),
            Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short fault name, used as the `error` field of the body.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Registered(fault) => fault.name(),
            _ => reason(self.status_code()),
        }
    }

    /// Human-readable description, used as the `description` field of the body.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::RouteNotFound => NOT_FOUND_DESCRIPTION.to_string(),
            Self::MethodNotAllowed { .. } => METHOD_NOT_ALLOWED_DESCRIPTION.to_string(),
            Self::MalformedBody { .. } => "JSON body was malformed".to_string(),
            Self::PayloadTooLarge { limit } => {
                format!("The request body exceeds the limit of {limit} bytes.")
            }
            Self::InvalidArgument(err) => err.to_string(),
            Self::Redirect(redirect) => format!("Redirecting to {}", redirect.location()),
            Self::Registered(fault) => fault.description().to_string(),
            Self::Http(fault) => fault.description().to_string(),
            Self::Unhandled(err) => err.to_string(),
        }
    }

    /// Structured body for the fault.
    ///
    /// Redirects render as `{"location": …}`; everything else as
    /// `{"error": name, "description": text}`, plus `details` for registered
    /// faults that carry them.
    #[must_use]
    pub fn to_body(&self) -> Value {
        match self {
            Self::Redirect(redirect) => json!({ "location": redirect.location() }),
            Self::Registered(fault) => {
                let mut body = json!({
                    "error": fault.name(),
                    "description": fault.description(),
                });
                if let Some(details) = fault.details() {
                    body["details"] = details.clone();
                }
                body
            }
            _ => json!({
                "error": self.name(),
                "description": self.description(),
            }),
        }
    }
}

impl From<Redirect> for Fault {
    fn from(redirect: Redirect) -> Self {
        Self::Redirect(redirect)
    }
}

impl From<AppFault> for Fault {
    fn from(fault: AppFault) -> Self {
        Self::Registered(fault)
    }
}

impl From<HttpFault> for Fault {
    fn from(fault: HttpFault) -> Self {
        Self::Http(fault)
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

fn is_error(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// A redirect marker returned by handlers.
///
/// # Example
///
/// ```
/// use arsa_core::{Fault, Redirect};
/// use http::StatusCode;
///
/// let fault: Fault = Redirect::to("https://arsa.io/login").into();
/// assert_eq!(fault.status_code(), StatusCode::FOUND);
/// assert_eq!(fault.to_body()["location"], "https://arsa.io/login");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
    status: StatusCode,
}

impl Redirect {
    /// A `302 Found` redirect.
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: StatusCode::FOUND,
        }
    }

    /// A `301 Moved Permanently` redirect.
    #[must_use]
    pub fn permanent(location: impl Into<String>) -> Self {
        Self::to(location).with_status(StatusCode::MOVED_PERMANENTLY)
    }

    /// Overrides the status. Non-3xx statuses are ignored.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        if status.is_redirection() {
            self.status = status;
        }
        self
    }

    /// Target location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Redirect status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// A fault type declared by the application.
///
/// Its status defaults to `400 Bad Request`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppFault {
    name: String,
    description: String,
    status: Option<StatusCode>,
    details: Option<Value>,
}

impl AppFault {
    /// Creates a fault with a name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: None,
            details: None,
        }
    }

    /// Sets the status. Statuses outside 4xx and 5xx are ignored.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        if is_error(status) {
            self.status = Some(status);
        }
        self
    }

    /// Attaches structured details to the body.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Fault name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fault description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Status, or `400` when none was set.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::BAD_REQUEST)
    }

    /// Structured details.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

/// A built-in HTTP fault named after its status reason phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFault {
    status: StatusCode,
    description: Option<String>,
}

impl HttpFault {
    /// Creates a fault for an error status.
    ///
    /// Statuses outside 4xx and 5xx become `500 Internal Server Error`.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: if is_error(status) {
                status
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            },
            description: None,
        }
    }

    /// `400 Bad Request`.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST)
    }

    /// `401 Unauthorized`.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED)
    }

    /// `403 Forbidden`.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN)
    }

    /// `404 Not Found`.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    /// `409 Conflict`.
    #[must_use]
    pub fn conflict() -> Self {
        Self::new(StatusCode::CONFLICT)
    }

    /// Overrides the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase of the status.
    #[must_use]
    pub fn name(&self) -> &'static str {
        reason(self.status)
    }

    /// Description, defaulting to the reason phrase.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| self.name())
    }
}
