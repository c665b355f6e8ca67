//! Error types for route definitions.

use serde_json::Value;
use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while ingesting route definitions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The definition is neither an integration, a wrapped integration nor
    /// a compute-backed definition.
    #[error("Invalid resource definition: {definition}")]
    UnrecognizedResourceDefinition {
        /// The offending definition, as given.
        definition: Value,
    },

    /// A recognized definition carries a malformed field.
    #[error("Invalid '{field}' in resource definition: {source}")]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

impl CoreError {
    /// Creates an unrecognized-definition error.
    pub fn unrecognized(definition: &Value) -> Self {
        Self::UnrecognizedResourceDefinition {
            definition: definition.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unrecognized_carries_definition() {
        let err = CoreError::unrecognized(&json!({ "handler": "x" }));
        assert!(err.to_string().contains("Invalid resource definition"));
        assert!(err.to_string().contains("handler"));
        let CoreError::UnrecognizedResourceDefinition { definition } = err else {
            panic!("wrong variant");
        };
        assert_eq!(definition, json!({ "handler": "x" }));
    }
}
