//! Configuration loader with layered approach.

use std::env;
use std::fs;
use std::path::Path;

use portico_core::CorsOptions;

use crate::{ConfigError, LogFormat, PorticoConfig};

/// Configuration loader.
///
/// Layers are applied in order, later layers overriding earlier ones:
/// 1. Default values
/// 2. Configuration file (TOML or JSON) or string
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// Validation runs once, in [`ConfigLoader::load`].
///
/// # Example
///
/// ```no_run
/// use portico_config::ConfigLoader;
///
/// # fn main() -> Result<(), portico_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("portico.toml")?
///     .with_env_prefix("PORTICO")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: PorticoConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PorticoConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with the development preset.
    ///
    /// ```
    /// use portico_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = PorticoConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = PorticoConfig::production();
        self
    }

    /// Load configuration from a file. The format follows the extension
    /// (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::with_file`] when the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// ```
    /// use portico_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[api]\nname = \"Orders\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.api.name, "Orders");
    /// assert_eq!(config.api.stage_name, "dev");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `PORTICO`:
    /// - `PORTICO__API__STAGE_NAME=prod`
    /// - `PORTICO__LOGGING__FORMAT=pretty`
    /// - `PORTICO__CORS__ALLOW_ORIGINS=https://a.example,https://b.example`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the current directory or its
    /// parents, if there is one.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        // Absence of a .env file is not an error.
        let _ = dotenvy::dotenv();
        self
    }

    /// Load variables from a specific `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvError` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<PorticoConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Return the configuration without env overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> PorticoConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<PorticoConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        // env::vars order is platform-defined
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // Another variable that merely shares the prefix.
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["API", "NAME"] => {
                self.config.api.name = value.to_string();
            }
            ["API", "STAGE_NAME"] => {
                self.config.api.stage_name = value.to_string();
            }
            ["API", "VALIDATE_REQUEST_BODY"] => {
                self.config.api.validate_request_body = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["API", "VALIDATE_REQUEST_PARAMETERS"] => {
                self.config.api.validate_request_parameters = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                self.config.logging.ansi_enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["CORS", "ALLOW_ORIGINS"] => {
                self.cors_mut().allow_origins = parse_list(value);
            }
            ["CORS", "ALLOW_HEADERS"] => {
                self.cors_mut().allow_headers = parse_list(value);
            }
            ["CORS", "ALLOW_CREDENTIALS"] => {
                self.cors_mut().allow_credentials = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["CORS", "MAX_AGE_SECS"] => {
                self.cors_mut().max_age_secs = Some(
                    value
                        .parse()
                        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?,
                );
            }

            _ => {}
        }

        Ok(())
    }

    fn cors_mut(&mut self) -> &mut CorsOptions {
        self.config.cors.get_or_insert_with(CorsOptions::default)
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated list, dropping blanks.
fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
