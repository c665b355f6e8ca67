//! Structured logging.
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! tracing::info!(http.method = "GET", api.path = "/users", "method attached");
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. "info", "portico=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Whether to emit ANSI colors (pretty format only).
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            file_line_info: true,
            include_target: true,
            ansi: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Initializes the global subscriber.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidConfig`] for a malformed filter and
/// [`TelemetryError::LoggingInit`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidConfig`] if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::InvalidConfig(format!("Invalid log level '{filter}': {e}")))
}

/// Standard log fields.
///
/// Use these field names for consistency across logs.
pub mod fields {
    /// API name field name.
    pub const API_NAME: &str = "api.name";

    /// Route path field name.
    pub const API_PATH: &str = "api.path";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// Integration type field name.
    pub const INTEGRATION: &str = "integration";

    /// Generated artifact name field name.
    pub const ARTIFACT: &str = "artifact";

    /// Duration field name (in milliseconds).
    pub const DURATION_MS: &str = "duration_ms";

    /// Error field name.
    pub const ERROR: &str = "error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_production_config() {
        assert_eq!(LogConfig::production(), LogConfig::default());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(fields::HTTP_METHOD, "http.method");
        assert_eq!(fields::API_PATH, "api.path");
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("portico=debug,warn").is_ok());
        assert!(matches!(
            create_env_filter("portico=[[["),
            Err(TelemetryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
