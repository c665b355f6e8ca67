//! # portico-cli
//!
//! Provides the `portico` command-line interface.
//!
//! ## Subcommands
//!
//! - `portico assemble` assembles a manifest into an API descriptor.
//! - `portico schema` converts a type schema into a validation document.
//! - `portico tree` prints the resource tree of a manifest.
//!
//! ```bash
//! portico assemble api.yaml --pretty --output api.json
//! portico schema user.json --model
//! portico tree api.toml
//! ```

#![forbid(unsafe_code)]

pub mod assemble;
pub mod schema;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};
use portico_config::{ConfigLoader, PorticoConfig};

/// Prefix of environment variables overriding configuration.
pub const ENV_PREFIX: &str = "PORTICO";

/// Default configuration file, used when present.
pub const DEFAULT_CONFIG_FILE: &str = "portico.toml";

/// Loads configuration: `.env`, then the given file (or `portico.toml` if
/// present), then `PORTICO__*` environment overrides.
///
/// # Errors
///
/// Fails if an explicitly given file is missing, or any source is invalid.
pub fn load_config(path: Option<&Path>) -> Result<PorticoConfig> {
    let loader = ConfigLoader::new().with_dotenv();

    let loader = match path {
        Some(path) => loader
            .with_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE)?,
    };

    loader
        .with_env_prefix(ENV_PREFIX)
        .load()
        .context("invalid configuration")
}
