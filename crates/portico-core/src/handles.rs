//! Handles to externally provisioned collaborators.
//!
//! Portico never provisions compute units, authorizers or backends itself.
//! It refers to them through these handles and passes them through to the
//! assembled descriptor.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::method::HttpMethod;

/// Reference to a compute unit (a function the gateway invokes).
///
/// Two handles refer to the same unit when their names are equal.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(from = "ComputeUnitRepr", rename_all = "camelCase")]
pub struct ComputeUnit {
    /// Function name.
    pub function_name: String,
    /// Fully qualified identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

/// Accepts either a bare function name or the full object form.
#[derive(Deserialize)]
#[serde(untagged)]
enum ComputeUnitRepr {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Full {
        function_name: String,
        #[serde(default)]
        arn: Option<String>,
    },
}

impl From<ComputeUnitRepr> for ComputeUnit {
    fn from(repr: ComputeUnitRepr) -> Self {
        match repr {
            ComputeUnitRepr::Name(function_name) => Self {
                function_name,
                arn: None,
            },
            ComputeUnitRepr::Full { function_name, arn } => Self { function_name, arn },
        }
    }
}

impl ComputeUnit {
    /// Creates a handle from a function name.
    #[must_use]
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            arn: None,
        }
    }

    /// Sets the fully qualified identifier.
    #[must_use]
    pub fn with_arn(mut self, arn: impl Into<String>) -> Self {
        self.arn = Some(arn.into());
        self
    }
}

impl PartialEq for ComputeUnit {
    fn eq(&self, other: &Self) -> bool {
        self.function_name == other.function_name
    }
}

impl std::hash::Hash for ComputeUnit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.function_name.hash(state);
    }
}

/// Kind of authorizer issued by the identity directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizerKind {
    /// User-pool token validation.
    #[default]
    CognitoUserPools,
    /// Custom token authorizer.
    Token,
    /// Custom request authorizer.
    Request,
}

impl AuthorizerKind {
    /// Gateway authorization type for methods guarded by this kind.
    #[must_use]
    pub const fn authorization_type(&self) -> &'static str {
        match self {
            Self::CognitoUserPools => "COGNITO_USER_POOLS",
            Self::Token | Self::Request => "CUSTOM",
        }
    }
}

/// Reference to an authorizer provisioned by the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorizer {
    /// Authorizer identifier.
    pub id: String,
    /// Authorizer kind.
    #[serde(default)]
    pub kind: AuthorizerKind,
    /// Request location carrying the credential (e.g. `method.request.header.Authorization`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_source: Option<String>,
}

impl Authorizer {
    /// Creates a user-pool authorizer handle.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AuthorizerKind::default(),
            identity_source: None,
        }
    }

    /// Sets the authorizer kind.
    #[must_use]
    pub fn with_kind(mut self, kind: AuthorizerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the identity source.
    #[must_use]
    pub fn with_identity_source(mut self, source: impl Into<String>) -> Self {
        self.identity_source = Some(source.into());
        self
    }
}

/// Options forwarded into an integration derived from a compute unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOptions {
    /// Use proxy integration (defaults to `true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<bool>,
    /// Integration timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// A concrete backend integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Integration {
    /// Invoke a compute unit.
    Lambda(LambdaIntegration),
    /// Forward to an HTTP endpoint.
    Http(HttpIntegration),
    /// Respond from the gateway itself.
    Mock(MockIntegration),
}

impl Integration {
    /// Creates a proxy integration invoking `function`.
    #[must_use]
    pub fn lambda(function: ComputeUnit) -> Self {
        Self::Lambda(LambdaIntegration::new(function))
    }

    /// Creates a proxy integration forwarding to `uri` for any method.
    #[must_use]
    pub fn http(uri: impl Into<String>) -> Self {
        Self::Http(HttpIntegration {
            uri: uri.into(),
            http_method: HttpMethod::Any,
            proxy: true,
        })
    }

    /// Creates a mock integration with a JSON request template.
    #[must_use]
    pub fn mock(template: impl Into<String>) -> Self {
        let mut request_templates = IndexMap::new();
        request_templates.insert(APPLICATION_JSON.to_string(), template.into());
        Self::Mock(MockIntegration { request_templates })
    }

    /// Short name of the integration type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Lambda(_) => "lambda",
            Self::Http(_) => "http",
            Self::Mock(_) => "mock",
        }
    }
}

/// Content type used for templates and models.
pub const APPLICATION_JSON: &str = "application/json";

fn default_true() -> bool {
    true
}

/// Integration invoking a compute unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaIntegration {
    /// The compute unit to invoke.
    pub function: ComputeUnit,
    /// Pass the raw request through.
    #[serde(default = "default_true")]
    pub proxy: bool,
    /// Integration timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Integration parameter ← method parameter mappings.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub request_parameters: IndexMap<String, String>,
    /// Request templates by content type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub request_templates: IndexMap<String, String>,
}

impl LambdaIntegration {
    /// Creates a proxy integration with no remapping.
    #[must_use]
    pub fn new(function: ComputeUnit) -> Self {
        Self {
            function,
            proxy: true,
            timeout_ms: None,
            request_parameters: IndexMap::new(),
            request_templates: IndexMap::new(),
        }
    }

    /// Applies forwarded options.
    #[must_use]
    pub fn with_options(mut self, options: &IntegrationOptions) -> Self {
        if let Some(proxy) = options.proxy {
            self.proxy = proxy;
        }
        if options.timeout_ms.is_some() {
            self.timeout_ms = options.timeout_ms;
        }
        self
    }
}

/// Integration forwarding to an HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpIntegration {
    /// Endpoint URI.
    pub uri: String,
    /// Method used towards the endpoint.
    #[serde(default = "default_any")]
    pub http_method: HttpMethod,
    /// Pass the raw request through.
    #[serde(default = "default_true")]
    pub proxy: bool,
}

fn default_any() -> HttpMethod {
    HttpMethod::Any
}

/// Integration answered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockIntegration {
    /// Request templates by content type.
    #[serde(default)]
    pub request_templates: IndexMap<String, String>,
}
