//! Configuration types.

use portico_core::CorsOptions;
use portico_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Complete Portico configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use portico_config::PorticoConfig;
///
/// let config = PorticoConfig::default();
/// assert_eq!(config.api.name, "RestApi");
/// assert_eq!(config.api.stage_name, "dev");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PorticoConfig {
    /// API descriptor settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// CORS options applied when a manifest declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsOptions>,
}

impl PorticoConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - the API or stage name is empty, or the stage name has characters
    ///   other than ASCII alphanumerics, `-` and `_`
    /// - the log level is not a valid filter directive
    /// - the CORS options are rejected by [`CorsOptions::validate`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.name.trim().is_empty() {
            return Err(ConfigError::invalid_value("api.name", "must not be empty"));
        }

        if self.api.stage_name.is_empty()
            || !self
                .api
                .stage_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::invalid_value(
                "api.stage_name",
                format!(
                    "'{}' must be non-empty and contain only alphanumerics, '-' or '_'",
                    self.api.stage_name
                ),
            ));
        }

        if self.logging.enabled {
            portico_telemetry::logging::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        if let Some(cors) = &self.cors {
            cors.validate()
                .map_err(|e| ConfigError::invalid_value("cors", e.to_string()))?;
        }

        Ok(())
    }

    /// Development preset: pretty, debug-level logs with source locations.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.api.stage_name = "prod".to_string();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// API descriptor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Name of the REST API.
    #[serde(default = "default_api_name")]
    pub name: String,

    /// Stage name carried in the descriptor.
    #[serde(default = "default_stage_name")]
    pub stage_name: String,

    /// Request validators check the body.
    #[serde(default = "default_true")]
    pub validate_request_body: bool,

    /// Request validators check path and query parameters.
    #[serde(default = "default_true")]
    pub validate_request_parameters: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            name: default_api_name(),
            stage_name: default_stage_name(),
            validate_request_body: true,
            validate_request_parameters: true,
        }
    }
}

fn default_api_name() -> String {
    "RestApi".to_string()
}

fn default_stage_name() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs.
    #[default]
    Json,
    /// Human-readable pretty format.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in pretty output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Converts the settings into a telemetry [`LogConfig`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            file_line_info: self.include_location,
            include_target: true,
            ansi: self.ansi_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PorticoConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.api.validate_request_body);
        assert!(config.api.validate_request_parameters);
        assert_eq!(config.cors, None);
    }

    #[test]
    fn test_presets() {
        let dev = PorticoConfig::development();
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert_eq!(dev.logging.level, "debug");

        let prod = PorticoConfig::production();
        assert_eq!(prod.logging.format, LogFormat::Json);
        assert_eq!(prod.api.stage_name, "prod");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut config = PorticoConfig::default();
        config.api.name = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "api.name"
        ));
    }

    #[test]
    fn test_invalid_stage_name_rejected() {
        let mut config = PorticoConfig::default();
        config.api.stage_name = "prod stage".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_cors_rejected() {
        let config = PorticoConfig {
            cors: Some(CorsOptions::default().allow_credentials(true)),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "cors"
        ));
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_to_log_config() {
        let log = PorticoConfig::development().logging.to_log_config();
        assert!(!log.json_format);
        assert!(log.file_line_info);
        assert!(log.ansi);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<PorticoConfig, _> = serde_json::from_str(r#"{"api": {"nam": "x"}}"#);
        assert!(result.is_err());
    }
}
