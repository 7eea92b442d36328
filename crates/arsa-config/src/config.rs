//! Top-level configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DispatchConfig, LoggingConfig};

/// Complete configuration of an Arsa application.
///
/// Unknown fields are rejected at every level.
///
/// # Example
///
/// ```
/// use arsa_config::ArsaConfig;
///
/// let config = ArsaConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.dispatch.server_name, "arsa.io");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArsaConfig {
    /// Dispatch pipeline settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArsaConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `dispatch.default_content_type` is not a MIME type
    /// - `dispatch.max_body_bytes` is zero
    /// - `logging.level` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .dispatch
            .default_content_type
            .parse::<mime::Mime>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "dispatch.default_content_type",
                format!("not a MIME type: {}", self.dispatch.default_content_type),
            ));
        }

        if self.dispatch.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "dispatch.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use arsa_config::ArsaConfig;
    ///
    /// let config = ArsaConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = arsa_telemetry::LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Production preset: JSON logs at info, path variables protected from
    /// being overridden by client-controlled sources.
    ///
    /// # Example
    ///
    /// ```
    /// use arsa_config::ArsaConfig;
    ///
    /// let config = ArsaConfig::production();
    /// assert!(config.dispatch.protect_path_variables);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = arsa_telemetry::LogFormat::Json;
        config.dispatch.protect_path_variables = true;

        config
    }
}
