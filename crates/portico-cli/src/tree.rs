//! `portico tree`: print the assembled resource tree.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use portico::RestApi;
use portico_config::PorticoConfig;

use crate::assemble::assemble_manifest;

/// Tree subcommand arguments.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Manifest file (.json, .toml, .yaml or .yml).
    pub manifest: PathBuf,
}

/// Execute the tree subcommand.
///
/// # Errors
///
/// Fails if the manifest cannot be loaded or assembled.
pub fn run_tree(args: &TreeArgs, config: &PorticoConfig) -> Result<u8> {
    let api = assemble_manifest(&args.manifest, config)?;
    print!("{}", render(&api));
    Ok(0)
}

/// One line per resource, indented by depth, with its methods.
fn render(api: &RestApi) -> String {
    let tree = &api.resources;
    let mut out = String::new();
    for id in tree.walk() {
        let node = tree.node(id);
        let label = if tree.depth(id) == 0 {
            "/".to_string()
        } else {
            format!("/{}", node.segment())
        };
        let methods: Vec<&str> = node.payload().methods.keys().map(|m| m.as_str()).collect();

        let _ = write!(out, "{}{label}", "  ".repeat(tree.depth(id)));
        if !methods.is_empty() {
            let _ = write!(out, "  [{}]", methods.join(" "));
        }
        out.push('\n');
    }
    out
}
