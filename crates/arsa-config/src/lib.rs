//! Typed configuration for Arsa applications.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`ARSA__SECTION__KEY`)
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use arsa_config::ConfigLoader;
//!
//! # fn main() -> Result<(), arsa_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("arsa.toml")?
//!     .with_env_prefix("ARSA")
//!     .load()?;
//!
//! println!("body limit: {} bytes", config.dispatch.max_body_bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [dispatch]
//! default_content_type = "application/json"
//! max_body_bytes = 6291456
//! protect_path_variables = false
//! server_name = "arsa.io"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! include_location = false
//! ```

mod config;
mod error;
mod loader;
mod schema;

pub use config::ArsaConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DispatchConfig, LoggingConfig};

pub use arsa_telemetry::LogFormat;
