//! # portico CLI entry point
//!
//! Parses command-line arguments, loads configuration, initializes logging
//! and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use portico_telemetry::{init_logging, metrics};

use portico_cli::assemble::{run_assemble, AssembleArgs};
use portico_cli::load_config;
use portico_cli::schema::{run_schema, SchemaArgs};
use portico_cli::tree::{run_tree, TreeArgs};

/// Portico: declarative REST contract assembler.
#[derive(Parser, Debug)]
#[command(name = "portico", version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity. Repeat for more (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file (TOML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a manifest into an API descriptor.
    Assemble(AssembleArgs),

    /// Convert a type schema into a validation document.
    Schema(SchemaArgs),

    /// Print the resource tree of a manifest.
    Tree(TreeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }

    if let Err(e) = init_logging(&config.logging.to_log_config()) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }
    metrics::describe_metrics();

    tracing::debug!(api.name = %config.api.name, stage = %config.api.stage_name, "portico starting");

    let result = match &cli.command {
        Commands::Assemble(args) => run_assemble(args, &config),
        Commands::Schema(args) => run_schema(args),
        Commands::Tree(args) => run_tree(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assemble() {
        let cli = Cli::try_parse_from(["portico", "assemble", "api.yaml", "--pretty", "-o", "out.json"])
            .unwrap();
        let Commands::Assemble(args) = cli.command else {
            panic!("expected assemble");
        };
        assert_eq!(args.manifest, PathBuf::from("api.yaml"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.pretty);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["portico", "tree", "api.toml", "-vv", "--config", "p.toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Commands::Tree(_)));
    }

    #[test]
    fn test_parse_schema_model_flag() {
        let cli = Cli::try_parse_from(["portico", "schema", "user.json", "--model"]).unwrap();
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema");
        };
        assert!(args.model);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["portico"]).is_err());
    }
}
