//! Schema error types.

use thiserror::Error;

/// Result type for schema validation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// The first schema violation found in a set of arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required field is absent.
    #[error("argument {path} was not detected")]
    MissingArgument {
        /// Fully qualified dotted path of the field.
        path: String,
    },

    /// A present field has the wrong shape.
    #[error("argument {path} was not of the type {expected} (found {found})")]
    TypeMismatch {
        /// Fully qualified dotted path of the field.
        path: String,
        /// Name of the declared type.
        expected: String,
        /// JSON type of the value received.
        found: &'static str,
    },
}

impl SchemaError {
    /// Returns the qualified path of the offending field.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingArgument { path } | Self::TypeMismatch { path, .. } => path,
        }
    }
}
