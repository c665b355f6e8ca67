//! # Portico
//!
//! **Declarative REST contract assembly**
//!
//! Portico turns a declarative description of an HTTP API into a fully wired
//! API descriptor:
//!
//! - **Resource tree** built from the declared paths, parameters included
//! - **Integrations** for every method, with parameters and bodies mapped
//!   into a uniform envelope for compute-backed routes
//! - **Request validators and models** converted from type schemas into
//!   JSON Schema draft-4 documents
//! - **Authorization** bound per method from the global authorizer and
//!   per-route overrides
//! - **CORS preflights** registered once per resource
//!
//! ## Quick Start
//!
//! ```
//! use portico::prelude::*;
//!
//! let get_user = ComputeDefinition::new(ComputeUnit::new("get-user"))
//!     .responses(Responses::Single(TypeSchema::object([("id", TypeSchema::string())])));
//!
//! let api = ApiDefinition::new("Users")
//!     .route("/users/{userId}", RouteDefinition::methods([(HttpMethod::Get, get_user)]))
//!     .assemble()
//!     .unwrap();
//!
//! let method = api.method("/users/{userId}", HttpMethod::Get).unwrap();
//! assert_eq!(method.request_validator.as_deref(), Some("GetUsersUseridRequestValidator"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Manifest ─┐
//!           ├→ ApiDefinition → probe → tree → resolve → bind → RestApi
//! Builder ──┘                                  ↓
//!                                   convert (validation models)
//! ```

#![doc(html_root_url = "https://docs.rs/portico/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
pub mod assembler;
mod descriptor;
mod error;
pub mod manifest;

pub use api::{ApiDefinition, ValidationSettings};
pub use assembler::assemble;
pub use descriptor::{
    MethodDescriptor, MethodResponse, Model, ModelSchema, RequestValidator, ResourceAttachments,
    RestApi,
};
pub use error::{AssemblyError, AssemblyResult};
pub use manifest::{Manifest, ManifestError, ManifestFormat, ManifestResult};

// Re-export component crates
pub use portico_config as config;
pub use portico_core as core;
pub use portico_schema as schema;
pub use portico_tree as tree;

pub use portico_core::{
    Authorizer, AuthorizerKind, ComputeDefinition, ComputeUnit, CorsOptions, GlobalPolicy,
    HttpMethod, Integration, ResourceDefinition, ResponseSpec, Responses, RouteAuth,
    RouteDefinition, RouteMetadata,
};
pub use portico_schema::TypeSchema;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use portico::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ApiDefinition, AssemblyError, AssemblyResult, Manifest, RestApi};

    pub use portico_config::{ConfigLoader, PorticoConfig};

    pub use portico_core::{
        Authorizer, ComputeDefinition, ComputeUnit, CorsOptions, GlobalPolicy, HttpMethod,
        Integration, ResourceDefinition, ResponseSpec, Responses, RouteAuth, RouteDefinition,
        RouteMetadata,
    };

    pub use portico_schema::TypeSchema;
}
