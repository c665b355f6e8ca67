//! Authorization and CORS policy binding.
//!
//! ## Precedence
//!
//! | Definition | Route `auth` | Effective authorizer | Scopes |
//! |---|---|---|---|
//! | raw integration | n/a | global | none |
//! | wrapped / compute | `false` | none (route open) | none |
//! | wrapped / compute | authorizer `H` | `H` | route's |
//! | wrapped / compute | absent | global | route's |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::definition::{ResourceDefinition, RouteAuth};
use crate::handles::Authorizer;

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    /// `Access-Control-Allow-Methods` header.
    pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
    /// `Access-Control-Allow-Credentials` header.
    pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
    /// `Access-Control-Max-Age` header.
    pub const MAX_AGE: &str = "Access-Control-Max-Age";
    /// `Access-Control-Expose-Headers` header.
    pub const EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
}

/// Every origin.
pub const ALL_ORIGINS: &[&str] = &["*"];

/// Every method a gateway resource may expose.
pub const ALL_METHODS: &[&str] = &["OPTIONS", "GET", "PUT", "POST", "DELETE", "PATCH", "HEAD"];

/// Headers allowed when none are configured.
pub const DEFAULT_HEADERS: &[&str] = &[
    "Content-Type",
    "X-Amz-Date",
    "Authorization",
    "X-Api-Key",
    "X-Amz-Security-Token",
    "X-Amz-User-Agent",
];

/// Longest preflight cache browsers honour, in seconds.
pub const MAX_AGE_LIMIT_SECS: u64 = 86_400;

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_origins() -> Vec<String> {
    to_strings(ALL_ORIGINS)
}

fn default_methods() -> Vec<String> {
    to_strings(ALL_METHODS)
}

fn default_headers() -> Vec<String> {
    to_strings(DEFAULT_HEADERS)
}

/// CORS preflight options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CorsOptions {
    /// Allowed origins; `*` allows any.
    #[serde(default = "default_origins")]
    pub allow_origins: Vec<String>,
    /// Allowed methods.
    #[serde(default = "default_methods")]
    pub allow_methods: Vec<String>,
    /// Allowed request headers.
    #[serde(default = "default_headers")]
    pub allow_headers: Vec<String>,
    /// Headers exposed to scripts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose_headers: Vec<String>,
    /// Allow credentials (cookies, authorization headers).
    #[serde(default)]
    pub allow_credentials: bool,
    /// Preflight cache duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_secs: Option<u64>,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            allow_origins: default_origins(),
            allow_methods: default_methods(),
            allow_headers: default_headers(),
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age_secs: None,
        }
    }
}

/// Invalid CORS options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorsError {
    /// No origin is allowed at all.
    #[error("CORS options must allow at least one origin")]
    NoOrigins,
    /// Credentials cannot be combined with the `*` origin.
    #[error("CORS credentials cannot be allowed for the '*' origin")]
    CredentialsWithAnyOrigin,
    /// The preflight cache duration exceeds what browsers honour.
    #[error("CORS max age {0}s exceeds the 86400s limit")]
    MaxAgeTooLarge(u64),
}

impl CorsOptions {
    /// Allows the given origins only.
    #[must_use]
    pub fn allow_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the allowed methods.
    #[must_use]
    pub fn allow_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the allowed request headers.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether credentials are allowed.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Sets the preflight cache duration.
    #[must_use]
    pub fn max_age_secs(mut self, secs: u64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    /// Returns `true` if any origin is allowed.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }

    /// Checks the options for combinations browsers reject.
    pub fn validate(&self) -> Result<(), CorsError> {
        if self.allow_origins.is_empty() {
            return Err(CorsError::NoOrigins);
        }
        if self.allow_credentials && self.allows_any_origin() {
            return Err(CorsError::CredentialsWithAnyOrigin);
        }
        if let Some(secs) = self.max_age_secs.filter(|&s| s > MAX_AGE_LIMIT_SECS) {
            return Err(CorsError::MaxAgeTooLarge(secs));
        }
        Ok(())
    }

    /// Response headers the preflight method returns, keyed by header name.
    ///
    /// Only the first origin is echoed statically; additional origins need
    /// a request-time check the gateway performs.
    #[must_use]
    pub fn preflight_headers(&self) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        if let Some(origin) = self.allow_origins.first() {
            out.insert(headers::ALLOW_ORIGIN.to_string(), origin.clone());
        }
        out.insert(headers::ALLOW_METHODS.to_string(), self.allow_methods.join(","));
        out.insert(headers::ALLOW_HEADERS.to_string(), self.allow_headers.join(","));
        if self.allow_credentials {
            out.insert(headers::ALLOW_CREDENTIALS.to_string(), "true".to_string());
        }
        if !self.expose_headers.is_empty() {
            out.insert(headers::EXPOSE_HEADERS.to_string(), self.expose_headers.join(","));
        }
        if let Some(secs) = self.max_age_secs {
            out.insert(headers::MAX_AGE.to_string(), secs.to_string());
        }
        out
    }
}

/// API-wide policy defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPolicy {
    /// Authorizer guarding every route unless overridden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<Authorizer>,
    /// CORS options; when set, every resource with methods gets a preflight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsOptions>,
}

impl GlobalPolicy {
    /// Sets the global authorizer.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: Authorizer) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Sets the global CORS options.
    #[must_use]
    pub fn with_cors(mut self, cors: CorsOptions) -> Self {
        self.cors = Some(cors);
        self
    }
}

/// Authorization applied to one method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePolicy {
    /// The guarding authorizer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<Authorizer>,
    /// Scopes the authorizer must grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_scopes: Option<Vec<String>>,
}

impl EffectivePolicy {
    /// Gateway authorization type: the authorizer's type, or `NONE`.
    #[must_use]
    pub fn authorization_type(&self) -> &'static str {
        self.authorizer
            .as_ref()
            .map_or("NONE", |a| a.kind.authorization_type())
    }
}

/// Computes the policy of a method. `None` means the route is open.
#[must_use]
pub fn bind(global: &GlobalPolicy, definition: &ResourceDefinition) -> Option<EffectivePolicy> {
    let Some(metadata) = definition.metadata() else {
        return Some(EffectivePolicy {
            authorizer: global.authorizer.clone(),
            authorization_scopes: None,
        });
    };

    let authorizer = match &metadata.auth {
        RouteAuth::Disabled => return None,
        RouteAuth::Authorizer(authorizer) => Some(authorizer.clone()),
        RouteAuth::Inherit => global.authorizer.clone(),
    };

    Some(EffectivePolicy {
        authorizer,
        authorization_scopes: metadata.authorization_scopes.clone(),
    })
}

/// Records a preflight on a resource slot.
///
/// Returns `true` if the slot was empty. Repeated requests leave the first
/// registration in place.
pub fn register_preflight(slot: &mut Option<CorsOptions>, cors: &CorsOptions) -> bool {
    match slot {
        Some(existing) => {
            if existing != cors {
                debug!("preflight already registered with different options; keeping the first");
            }
            false
        }
        None => {
            *slot = Some(cors.clone());
            true
        }
    }
}
