//! # Portico Core
//!
//! Route definitions and the pure stages that turn one route into a method
//! descriptor:
//!
//! - [`ResourceDefinition::probe`] - settles the shape of a loosely typed definition
//! - [`resolver::resolve`] - derives the concrete [`Integration`] for a definition
//! - [`policy::bind`] - computes the effective authorization of a method
//! - [`naming::artifact_name`] - names validators and models deterministically
//!
//! Collaborators (compute units, authorizers, backends) are referenced by
//! the handles in [`handles`] and never provisioned here.

#![doc(html_root_url = "https://docs.rs/portico-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod definition;
mod error;
pub mod fixtures;
pub mod handles;
mod method;
pub mod naming;
pub mod policy;
pub mod resolver;

pub use definition::{
    ComputeDefinition, ResourceDefinition, ResponseSpec, Responses, RouteAuth, RouteDefinition,
    RouteMetadata,
};
pub use error::{CoreError, CoreResult};
pub use handles::{
    Authorizer, AuthorizerKind, ComputeUnit, HttpIntegration, Integration, IntegrationOptions,
    LambdaIntegration, MockIntegration, APPLICATION_JSON,
};
pub use method::{HttpMethod, UnknownMethod};
pub use policy::{bind, register_preflight, CorsError, CorsOptions, EffectivePolicy, GlobalPolicy};
pub use resolver::{resolve, ResolveContext};
