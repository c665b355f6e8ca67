//! Typed configuration for Portico.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`PREFIX__SECTION__KEY`)
//! - `.env` files through `dotenvy`
//! - Strict validation (unknown fields are rejected)
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! name = "Orders"
//! stage_name = "dev"
//! validate_request_body = true
//! validate_request_parameters = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! # Used when the manifest declares no CORS options.
//! [cors]
//! allowOrigins = ["https://app.example"]
//! maxAgeSecs = 600
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod loader;

pub use config::{ApiConfig, LogFormat, LoggingConfig, PorticoConfig};
pub use error::ConfigError;
pub use loader::ConfigLoader;
