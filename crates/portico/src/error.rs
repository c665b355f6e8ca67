//! Assembly errors.
//!
//! Every error aborts the whole build; nothing is partially attached.

use portico_core::{CoreError, CorsError, HttpMethod};
use portico_schema::SchemaError;
use thiserror::Error;

/// Result type alias using [`AssemblyError`].
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors raised while assembling an API.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A route definition could not be understood.
    #[error(transparent)]
    Definition(#[from] CoreError),

    /// A request or response schema could not be converted.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The global CORS options are unusable.
    #[error(transparent)]
    Cors(#[from] CorsError),

    /// Two routes attach the same method to the same resource.
    #[error("Method {method} is declared twice on resource '{path}'")]
    DuplicateMethod {
        /// The method.
        method: HttpMethod,
        /// Normalized resource path.
        path: String,
    },

    /// Two artifacts were given the same generated name.
    #[error("Generated name '{name}' is used by more than one artifact")]
    DuplicateArtifact {
        /// The colliding name.
        name: String,
    },
}

impl AssemblyError {
    /// Short, stable label for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Definition(_) => "definition",
            Self::Schema(SchemaError::UnsupportedSchemaConstruct { .. }) => "unsupported_schema",
            Self::Schema(SchemaError::NonObjectModel { .. }) => "non_object_model",
            Self::Schema(_) => "schema",
            Self::Cors(_) => "cors",
            Self::DuplicateMethod { .. } => "duplicate_method",
            Self::DuplicateArtifact { .. } => "duplicate_artifact",
        }
    }
}
