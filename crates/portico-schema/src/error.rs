//! Error types for schema conversion.
//!
//! Conversion failures are fatal for the whole build: the same invalid
//! schema always fails the same way.

use thiserror::Error;

/// Errors that can occur while converting a type schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema contains a construct that has no validation-schema form.
    #[error("Unsupported field type: {kind} ({node})")]
    UnsupportedSchemaConstruct {
        /// Kind of the offending schema node (e.g. `record`).
        kind: &'static str,
        /// Debug rendering of the offending node.
        node: String,
    },

    /// A request/response model was declared with a non-object root.
    #[error("Model schema must be an object, got {kind}")]
    NonObjectModel {
        /// Kind of the root schema node.
        kind: &'static str,
    },

    /// A schema document could not be parsed.
    #[error("Failed to parse type schema: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SchemaError {
    /// Creates an unsupported-construct error for the given node.
    pub fn unsupported(kind: &'static str, node: &impl std::fmt::Debug) -> Self {
        Self::UnsupportedSchemaConstruct {
            kind,
            node: format!("{node:?}"),
        }
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
