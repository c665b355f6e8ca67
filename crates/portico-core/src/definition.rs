//! Route and resource definitions.
//!
//! A route's definition arrives in one of three shapes that are told apart by
//! which fields are present. [`ResourceDefinition::probe`] settles the shape
//! once, when the declarative input is read, and every later stage works on
//! the explicit variant.
//!
//! Probe order (first match wins):
//!
//! 1. the value is itself an [`Integration`];
//! 2. its `integration` field is an [`Integration`];
//! 3. its `function` field is a [`ComputeUnit`];
//! 4. otherwise the definition is rejected.

use indexmap::IndexMap;
use portico_schema::TypeSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::handles::{Authorizer, ComputeUnit, Integration, IntegrationOptions};
use crate::method::HttpMethod;

/// Per-route authorization override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RouteAuthRepr")]
pub enum RouteAuth {
    /// Use the global authorizer (no `auth` key, or `auth: true`).
    #[default]
    Inherit,
    /// Leave the route open (`auth: false`).
    Disabled,
    /// Use this authorizer instead of the global one.
    Authorizer(Authorizer),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RouteAuthRepr {
    Flag(bool),
    Authorizer(Authorizer),
}

impl From<RouteAuthRepr> for RouteAuth {
    fn from(repr: RouteAuthRepr) -> Self {
        match repr {
            RouteAuthRepr::Flag(false) => Self::Disabled,
            RouteAuthRepr::Flag(true) => Self::Inherit,
            RouteAuthRepr::Authorizer(authorizer) => Self::Authorizer(authorizer),
        }
    }
}

/// A response declaration with an explicit status code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status_code: u16,
    /// Body schema.
    pub schema: TypeSchema,
}

/// Declared responses of a route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Responses {
    /// One response per status code.
    List(Vec<ResponseSpec>),
    /// Shorthand for a single `200` response.
    Single(TypeSchema),
}

impl Responses {
    /// Expands the shorthand form into `(status, schema)` pairs.
    #[must_use]
    pub fn entries(&self) -> Vec<(u16, &TypeSchema)> {
        match self {
            Self::Single(schema) => vec![(200, schema)],
            Self::List(list) => list.iter().map(|r| (r.status_code, &r.schema)).collect(),
        }
    }

    /// Returns `true` for the single-schema shorthand.
    #[must_use]
    pub fn is_shorthand(&self) -> bool {
        matches!(self, Self::Single(_))
    }
}

/// Policy and schema metadata attached to a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMetadata {
    /// Authorization override.
    pub auth: RouteAuth,
    /// Request body schema.
    pub request: Option<TypeSchema>,
    /// Response schemas.
    pub responses: Option<Responses>,
    /// Scopes required by the authorizer.
    pub authorization_scopes: Option<Vec<String>>,
}

impl RouteMetadata {
    /// Parses metadata fields from a definition object.
    fn from_definition(value: &Value) -> CoreResult<Self> {
        Ok(Self {
            auth: field(value, "auth")?.unwrap_or_default(),
            request: field(value, "request")?,
            responses: field(value, "responses")?,
            authorization_scopes: field(value, "authorizationScopes")?,
        })
    }
}

/// A definition derived from a compute unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeDefinition {
    /// The compute unit to invoke.
    pub function: ComputeUnit,
    /// Declared query parameters and whether each is required.
    pub query_params: IndexMap<String, bool>,
    /// Options forwarded into the derived integration.
    pub options: IntegrationOptions,
    /// Policy and schema metadata.
    pub metadata: RouteMetadata,
}

impl ComputeDefinition {
    /// Creates a definition with no query parameters or metadata.
    #[must_use]
    pub fn new(function: ComputeUnit) -> Self {
        Self {
            function,
            query_params: IndexMap::new(),
            options: IntegrationOptions::default(),
            metadata: RouteMetadata::default(),
        }
    }

    /// Declares a query parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, required: bool) -> Self {
        self.query_params.insert(name.into(), required);
        self
    }

    /// Sets the forwarded integration options.
    #[must_use]
    pub fn options(mut self, options: IntegrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the authorization override.
    #[must_use]
    pub fn auth(mut self, auth: RouteAuth) -> Self {
        self.metadata.auth = auth;
        self
    }

    /// Sets the request schema.
    #[must_use]
    pub fn request(mut self, schema: TypeSchema) -> Self {
        self.metadata.request = Some(schema);
        self
    }

    /// Sets the responses.
    #[must_use]
    pub fn responses(mut self, responses: Responses) -> Self {
        self.metadata.responses = Some(responses);
        self
    }

    /// Sets the required authorization scopes.
    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.authorization_scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }
}

/// How a single method of a route is served.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDefinition {
    /// A ready-made integration, used as is.
    Integration(Integration),
    /// A ready-made integration with metadata.
    Wrapped {
        /// The integration.
        integration: Integration,
        /// Policy and schema metadata.
        metadata: RouteMetadata,
    },
    /// An integration to derive from a compute unit.
    Compute(ComputeDefinition),
}

impl ResourceDefinition {
    /// Resolves a loosely shaped definition into an explicit variant.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnrecognizedResourceDefinition`] when no shape
    /// matches, and [`CoreError::InvalidField`] when a recognized shape has a
    /// malformed metadata field.
    pub fn probe(value: &Value) -> CoreResult<Self> {
        if let Ok(integration) = Integration::deserialize(value) {
            debug!(shape = "integration", kind = integration.type_name(), "probed resource definition");
            return Ok(Self::Integration(integration));
        }

        if let Some(Ok(integration)) = value.get("integration").map(Integration::deserialize) {
            debug!(shape = "wrapped", kind = integration.type_name(), "probed resource definition");
            return Ok(Self::Wrapped {
                integration,
                metadata: RouteMetadata::from_definition(value)?,
            });
        }

        if let Some(Ok(function)) = value.get("function").map(ComputeUnit::deserialize) {
            debug!(shape = "compute", function = %function.function_name, "probed resource definition");
            let options = IntegrationOptions {
                proxy: field(value, "proxy")?,
                timeout_ms: field(value, "timeoutMs")?,
            };
            return Ok(Self::Compute(ComputeDefinition {
                function,
                query_params: field(value, "queryParams")?.unwrap_or_default(),
                options,
                metadata: RouteMetadata::from_definition(value)?,
            }));
        }

        Err(CoreError::unrecognized(value))
    }

    /// Wraps an integration with metadata.
    #[must_use]
    pub fn wrapped(integration: Integration, metadata: RouteMetadata) -> Self {
        Self::Wrapped {
            integration,
            metadata,
        }
    }

    /// Metadata, if the definition carries any. Raw integrations carry none.
    #[must_use]
    pub fn metadata(&self) -> Option<&RouteMetadata> {
        match self {
            Self::Integration(_) => None,
            Self::Wrapped { metadata, .. } => Some(metadata),
            Self::Compute(compute) => Some(&compute.metadata),
        }
    }

    /// Declared query parameters. Only compute-backed definitions have them.
    #[must_use]
    pub fn query_params(&self) -> Option<&IndexMap<String, bool>> {
        match self {
            Self::Compute(compute) => Some(&compute.query_params),
            _ => None,
        }
    }

    /// Short name of the definition shape.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Integration(_) => "integration",
            Self::Wrapped { .. } => "wrapped",
            Self::Compute(_) => "compute",
        }
    }
}

impl From<Integration> for ResourceDefinition {
    fn from(integration: Integration) -> Self {
        Self::Integration(integration)
    }
}

impl From<ComputeDefinition> for ResourceDefinition {
    fn from(compute: ComputeDefinition) -> Self {
        Self::Compute(compute)
    }
}

/// Everything declared for one path.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDefinition {
    /// Catch-all: every method and sub-path below the node.
    Proxy(ResourceDefinition),
    /// Explicit methods, each with its own definition.
    Methods(IndexMap<HttpMethod, ResourceDefinition>),
}

impl RouteDefinition {
    /// Creates a catch-all route.
    #[must_use]
    pub fn proxy(definition: impl Into<ResourceDefinition>) -> Self {
        Self::Proxy(definition.into())
    }

    /// Creates a route from `(method, definition)` pairs. A repeated method
    /// replaces the earlier definition.
    #[must_use]
    pub fn methods<I, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (HttpMethod, D)>,
        D: Into<ResourceDefinition>,
    {
        Self::Methods(entries.into_iter().map(|(m, d)| (m, d.into())).collect())
    }
}

fn field<T: serde::de::DeserializeOwned>(value: &Value, name: &'static str) -> CoreResult<Option<T>> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => T::deserialize(raw)
            .map(Some)
            .map_err(|source| CoreError::InvalidField { field: name, source }),
    }
}
