//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling an [`ArsaConfig`](crate::ArsaConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("cannot read configuration file {}", path.display())]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The format is neither TOML nor JSON.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// TOML document does not fit the configuration layout.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON document does not fit the configuration layout.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file exists but is malformed.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A field holds a value the dispatcher cannot use.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field name, e.g. `dispatch.max_body_bytes`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable could not be applied.
    #[error("cannot apply {var}: {reason}")]
    EnvVar {
        /// Variable name.
        var: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_var(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvVar {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = ConfigError::file_not_found("/etc/arsa/arsa.toml");
        assert_eq!(err.to_string(), "configuration file not found: /etc/arsa/arsa.toml");

        let err = ConfigError::invalid_value("dispatch.max_body_bytes", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid value for dispatch.max_body_bytes: must be positive"
        );

        let err = ConfigError::env_var("ARSA__DISPATCH__MAX_BODY_BYTES", "expected integer");
        assert_eq!(
            err.to_string(),
            "cannot apply ARSA__DISPATCH__MAX_BODY_BYTES: expected integer"
        );
    }

    #[test]
    fn test_read_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read("/etc/arsa/arsa.toml", io);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("denied"));
    }

    #[test]
    fn test_toml_error_from() {
        let parse = toml::from_str::<toml::Value>("not = = toml").unwrap_err();
        assert!(matches!(ConfigError::from(parse), ConfigError::Toml(_)));
    }
}
