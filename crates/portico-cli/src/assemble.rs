//! `portico assemble`: manifest in, API descriptor out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use portico::{Manifest, RestApi};
use portico_config::PorticoConfig;
use tracing::info;

/// Assemble subcommand arguments.
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Manifest file (.json, .toml, .yaml or .yml).
    pub manifest: PathBuf,

    /// Write the descriptor to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the descriptor.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the assemble subcommand.
///
/// # Errors
///
/// Fails if the manifest cannot be loaded or assembled, or the output
/// cannot be written.
pub fn run_assemble(args: &AssembleArgs, config: &PorticoConfig) -> Result<u8> {
    let api = assemble_manifest(&args.manifest, config)?;
    let json = api.to_json(args.pretty)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), methods = api.method_count(), "descriptor written");
        }
        None => println!("{json}"),
    }
    Ok(0)
}

/// Loads a manifest and assembles it.
///
/// # Errors
///
/// Fails if the manifest cannot be loaded or assembled.
pub fn assemble_manifest(path: &Path, config: &PorticoConfig) -> Result<RestApi> {
    let manifest = Manifest::from_path(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    manifest
        .into_definition(config)
        .assemble()
        .with_context(|| format!("failed to assemble {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "name": "Orders",
        "paths": {
            "/orders/{orderId}": { "get": { "function": "get-order" } }
        }
    }"#;

    #[test]
    fn test_assemble_to_file() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("api.json");
        let output = dir.path().join("out.json");
        fs::write(&manifest, MANIFEST).unwrap();

        let args = AssembleArgs {
            manifest,
            output: Some(output.clone()),
            pretty: true,
        };
        assert_eq!(run_assemble(&args, &PorticoConfig::default()).unwrap(), 0);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written["name"], "Orders");
        assert!(written["validators"]
            .get("GetOrdersOrderidRequestValidator")
            .is_some());
    }

    #[test]
    fn test_assemble_reports_manifest_path() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("broken.json");
        fs::write(&manifest, r#"{"paths": {"/x": {"get": {"nope": 1}}}}"#).unwrap();

        let err = assemble_manifest(&manifest, &PorticoConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
