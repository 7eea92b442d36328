//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use arsa_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Dispatch pipeline configuration section.
///
/// # Example
///
/// ```
/// use arsa_config::DispatchConfig;
///
/// let config = DispatchConfig::default();
/// assert_eq!(config.default_content_type, "application/json");
/// assert_eq!(config.max_body_bytes, 6 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Content type for routes that declare none, and for faults raised
    /// before a route is matched.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,

    /// Largest accepted request body. Larger bodies fault with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// When set, query, form and body keys never replace a path variable.
    #[serde(default)]
    pub protect_path_variables: bool,

    /// Host stamped on requests that arrive without a `Host` header.
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_content_type: default_content_type(),
            max_body_bytes: default_max_body_bytes(),
            protect_path_variables: false,
            server_name: default_server_name(),
        }
    }
}

fn default_content_type() -> String {
    "application/json".to_string()
}

// Synchronous proxy-integration payload limit.
fn default_max_body_bytes() -> usize {
    6 * 1024 * 1024
}

fn default_server_name() -> String {
    "arsa.io".to_string()
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "arsa=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line number in each event.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Converts this section into the telemetry crate's [`LogConfig`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level.clone(),
            format: self.format,
            include_location: self.include_location,
            ..LogConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.default_content_type, "application/json");
        assert_eq!(config.max_body_bytes, 6_291_456);
        assert!(!config.protect_path_variables);
        assert_eq!(config.server_name, "arsa.io");
    }

    #[test]
    fn test_dispatch_partial_toml() {
        let config: DispatchConfig = toml::from_str("protect_path_variables = true").unwrap();
        assert!(config.protect_path_variables);
        assert_eq!(config.default_content_type, "application/json");
    }

    #[test]
    fn test_dispatch_unknown_field_rejected() {
        let result: Result<DispatchConfig, _> = toml::from_str("max_body = 10");
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_format_lowercase() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "compact"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_to_log_config() {
        let section = LoggingConfig {
            level: "arsa=debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
        };
        let log = section.to_log_config();
        assert!(log.enabled);
        assert_eq!(log.level, "arsa=debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert!(log.include_location);
    }
}
