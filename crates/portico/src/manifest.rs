//! Declarative API manifests.
//!
//! A manifest describes an API in JSON, TOML or YAML:
//!
//! ```json
//! {
//!   "name": "Orders",
//!   "global": { "auth": { "id": "pool" }, "cors": { "allowOrigins": ["*"] } },
//!   "paths": {
//!     "/orders/{orderId}": {
//!       "get": { "function": "getOrder", "responses": { "kind": "object" } }
//!     },
//!     "/legacy": { "proxy": { "type": "http", "uri": "https://legacy.example" } }
//!   }
//! }
//! ```
//!
//! Every definition is probed into its explicit shape here, once. Keys that
//! mean nothing to the assembler are reported with a warning and skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use portico_config::PorticoConfig;
use portico_core::{
    CoreError, CorsOptions, GlobalPolicy, HttpMethod, ResourceDefinition, RouteAuth,
    RouteDefinition,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::ApiDefinition;

/// Result type alias using [`ManifestError`].
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors raised while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}")]
    Read {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension names no supported format.
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    /// JSON parsing error.
    #[error("failed to parse JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("failed to parse TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("failed to parse YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A route definition was rejected.
    #[error("route '{path}' ({key}): {source}")]
    Definition {
        /// Route path as written.
        path: String,
        /// Method or `proxy` key of the definition.
        key: String,
        /// Underlying error.
        #[source]
        source: CoreError,
    },

    /// A global policy entry was rejected.
    #[error("invalid global '{field}': {source}")]
    Global {
        /// Name of the entry.
        field: &'static str,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Manifest serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// JSON.
    Json,
    /// TOML.
    Toml,
    /// YAML.
    Yaml,
}

impl ManifestFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for unknown extensions.
    pub fn from_path(path: &Path) -> ManifestResult<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .parse()
    }
}

impl FromStr for ManifestFormat {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ManifestError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        })
    }
}

#[derive(Deserialize)]
struct Document {
    name: Option<String>,
    #[serde(default)]
    global: GlobalSection,
    #[serde(default)]
    paths: IndexMap<String, IndexMap<String, Value>>,
    #[serde(flatten)]
    unknown: IndexMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct GlobalSection {
    auth: Option<Value>,
    cors: Option<Value>,
    #[serde(flatten)]
    unknown: IndexMap<String, Value>,
}

/// A parsed manifest: probed routes plus global policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// API name, if the manifest declares one.
    pub name: Option<String>,
    /// Global authorizer and CORS options.
    pub policy: GlobalPolicy,
    /// Routes by path, in document order.
    pub routes: IndexMap<String, RouteDefinition>,
}

impl Manifest {
    /// Reads and parses a manifest file; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the file cannot be read or parsed, or a
    /// definition is rejected.
    pub fn from_path(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(manifest = %path.display(), %format, "reading manifest");
        Self::parse(&content, format)
    }

    /// Parses a manifest from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the document cannot be parsed or a
    /// definition is rejected.
    pub fn parse(content: &str, format: ManifestFormat) -> ManifestResult<Self> {
        let document: Document = match format {
            ManifestFormat::Json => serde_json::from_str(content)?,
            ManifestFormat::Toml => toml::from_str(content)?,
            ManifestFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Self::from_document(document)
    }

    fn from_document(document: Document) -> ManifestResult<Self> {
        for key in document.unknown.keys() {
            warn!(key = %key, "unknown manifest key ignored");
        }
        for key in document.global.unknown.keys() {
            warn!(key = %key, "unknown global key ignored");
        }

        let policy = global_policy(document.global)?;

        let routes = document
            .paths
            .into_iter()
            .map(|(path, entries)| {
                let route = route_definition(&path, &entries)?;
                Ok((path, route))
            })
            .collect::<ManifestResult<IndexMap<_, _>>>()?;

        Ok(Self {
            name: document.name,
            policy,
            routes,
        })
    }

    /// Builds an API definition, completing it from configuration.
    ///
    /// The manifest's name wins over the configured one; configured CORS
    /// options apply only when the manifest declares none.
    #[must_use]
    pub fn into_definition(self, config: &PorticoConfig) -> ApiDefinition {
        let name = self.name.unwrap_or_else(|| config.api.name.clone());
        let mut definition = ApiDefinition::new(name).policy(self.policy).with_config(config);
        definition.routes = self.routes;
        definition
    }
}

fn global_policy(global: GlobalSection) -> ManifestResult<GlobalPolicy> {
    let authorizer = match global.auth.map(RouteAuth::deserialize).transpose() {
        Ok(Some(RouteAuth::Authorizer(authorizer))) => Some(authorizer),
        Ok(Some(RouteAuth::Inherit)) => {
            warn!("global auth 'true' names no authorizer; routes stay open");
            None
        }
        Ok(Some(RouteAuth::Disabled) | None) => None,
        Err(source) => return Err(ManifestError::Global { field: "auth", source }),
    };

    let cors = global
        .cors
        .map(CorsOptions::deserialize)
        .transpose()
        .map_err(|source| ManifestError::Global { field: "cors", source })?;

    Ok(GlobalPolicy { authorizer, cors })
}

/// A truthy `proxy` entry makes the whole route a catch-all.
fn route_definition(path: &str, entries: &IndexMap<String, Value>) -> ManifestResult<RouteDefinition> {
    if let Some(proxy) = entries.get("proxy").filter(|v| is_truthy(v)) {
        for key in entries.keys().filter(|k| k.as_str() != "proxy") {
            warn!(api.path = %path, key = %key, "key ignored on proxy route");
        }
        return probe(path, "proxy", proxy).map(RouteDefinition::Proxy);
    }

    let mut methods = IndexMap::new();
    for (key, value) in entries {
        let Some(method) = route_method(key) else {
            warn!(api.path = %path, key = %key, "unknown route key ignored");
            continue;
        };
        if !is_truthy(value) {
            continue;
        }
        methods.insert(method, probe(path, key, value)?);
    }
    Ok(RouteDefinition::Methods(methods))
}

fn probe(path: &str, key: &str, value: &Value) -> ManifestResult<ResourceDefinition> {
    ResourceDefinition::probe(value).map_err(|source| ManifestError::Definition {
        path: path.to_string(),
        key: key.to_string(),
        source,
    })
}

/// Route keys are the lowercase names of the route methods.
fn route_method(key: &str) -> Option<HttpMethod> {
    HttpMethod::ROUTE_METHODS
        .into_iter()
        .find(|m| m.as_str().to_ascii_lowercase() == key)
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::{Authorizer, Integration};

    fn json(content: &str) -> ManifestResult<Manifest> {
        Manifest::parse(content, ManifestFormat::Json)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("api.YML")).unwrap(),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("api.toml")).unwrap(),
            ManifestFormat::Toml
        );
        assert!(matches!(
            ManifestFormat::from_path(Path::new("api")),
            Err(ManifestError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_paths_keep_document_order() {
        let manifest = json(
            r#"{"paths": {
                "/z": {"get": {"type": "mock"}},
                "/a": {"get": {"type": "mock"}},
                "/m": {"get": {"type": "mock"}}
            }}"#,
        )
        .unwrap();
        assert_eq!(manifest.routes.keys().collect::<Vec<_>>(), vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn test_proxy_route() {
        let manifest = json(
            r#"{"paths": {"/p": {"proxy": {"type": "http", "uri": "https://x.example"}, "get": {"type": "mock"}}}}"#,
        )
        .unwrap();
        assert_eq!(
            manifest.routes["/p"],
            RouteDefinition::proxy(Integration::http("https://x.example"))
        );
    }

    #[test]
    fn test_falsy_proxy_falls_back_to_methods() {
        let manifest = json(r#"{"paths": {"/p": {"proxy": false, "get": {"type": "mock"}}}}"#).unwrap();
        let RouteDefinition::Methods(methods) = &manifest.routes["/p"] else {
            panic!("expected methods");
        };
        assert!(methods.contains_key(&HttpMethod::Get));
    }

    #[test]
    fn test_unknown_and_null_keys_skipped() {
        let manifest = json(
            r#"{"paths": {"/p": {"GET": {"type": "mock"}, "patch": {"type": "mock"}, "put": null, "post": {"type": "mock"}}}}"#,
        )
        .unwrap();
        let RouteDefinition::Methods(methods) = &manifest.routes["/p"] else {
            panic!("expected methods");
        };
        assert_eq!(methods.keys().copied().collect::<Vec<_>>(), vec![HttpMethod::Post]);
    }

    #[test]
    fn test_unrecognized_definition_reports_route() {
        let err = json(r#"{"paths": {"/p": {"delete": {"handler": "x"}}}}"#).unwrap_err();
        let ManifestError::Definition { path, key, source } = err else {
            panic!("expected definition error");
        };
        assert_eq!(path, "/p");
        assert_eq!(key, "delete");
        assert!(matches!(source, CoreError::UnrecognizedResourceDefinition { .. }));
    }

    #[test]
    fn test_global_policy() {
        let manifest = json(
            r#"{"global": {"auth": {"id": "pool"}, "cors": {"allowOrigins": ["https://app.example"]}}, "paths": {}}"#,
        )
        .unwrap();
        assert_eq!(manifest.policy.authorizer, Some(Authorizer::new("pool")));
        assert_eq!(
            manifest.policy.cors.unwrap().allow_origins,
            vec!["https://app.example"]
        );

        let manifest = json(r#"{"global": {"auth": false}}"#).unwrap();
        assert_eq!(manifest.policy.authorizer, None);
    }

    #[test]
    fn test_invalid_global_cors() {
        let err = json(r#"{"global": {"cors": {"allowOrigin": "*"}}}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Global { field: "cors", .. }));
    }

    #[test]
    fn test_into_definition_uses_config() {
        let mut config = PorticoConfig::default();
        config.api.name = "Configured".to_string();
        config.api.stage_name = "qa".to_string();

        let unnamed = json(r#"{"paths": {}}"#).unwrap().into_definition(&config);
        assert_eq!(unnamed.name, "Configured");
        assert_eq!(unnamed.stage_name, "qa");

        let named = json(r#"{"name": "Orders"}"#).unwrap().into_definition(&config);
        assert_eq!(named.name, "Orders");
    }
}
