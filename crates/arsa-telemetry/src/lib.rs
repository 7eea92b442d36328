//! Structured logging for Arsa.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a JSON,
//! pretty or compact fmt layer, and defines the field names used by the
//! dispatcher's log events.

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
