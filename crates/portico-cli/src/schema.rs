//! `portico schema`: type schema in, validation document out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use portico_schema::{convert, convert_model, TypeSchema, JSON_SCHEMA_DRAFT4};
use serde_json::Value;

/// Schema subcommand arguments.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// JSON file holding a type schema.
    pub file: PathBuf,

    /// Convert as a top-level model: require an object and add the
    /// `$schema` marker.
    #[arg(long)]
    pub model: bool,
}

/// Execute the schema subcommand.
///
/// # Errors
///
/// Fails if the file cannot be read or the schema cannot be converted.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let document = convert_text(&content, args.model)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(0)
}

fn convert_text(content: &str, model: bool) -> Result<Value> {
    let schema: TypeSchema = serde_json::from_str(content).context("invalid type schema")?;

    if !model {
        return Ok(serde_json::to_value(convert(&schema)?)?);
    }

    let mut document = serde_json::to_value(convert_model(&schema)?)?;
    if let Value::Object(map) = &mut document {
        map.insert("$schema".to_string(), Value::from(JSON_SCHEMA_DRAFT4));
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_plain_schema() {
        let document = convert_text(r#"{"kind": "string"}"#, false).unwrap();
        assert_eq!(document, serde_json::json!({"type": "string"}));
    }

    #[test]
    fn test_convert_model_adds_marker() {
        let document = convert_text(
            r#"{"kind": "object", "fields": {"id": {"kind": "string"}}}"#,
            true,
        )
        .unwrap();
        assert_eq!(document["$schema"], JSON_SCHEMA_DRAFT4);
        assert_eq!(document["required"], serde_json::json!(["id"]));
    }

    #[test]
    fn test_model_must_be_object() {
        assert!(convert_text(r#"{"kind": "number"}"#, true).is_err());
    }
}
