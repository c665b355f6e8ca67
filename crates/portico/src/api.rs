//! Programmatic API definitions.

use indexmap::IndexMap;
use portico_config::PorticoConfig;
use portico_core::{Authorizer, CorsOptions, GlobalPolicy, RouteDefinition};
use tracing::warn;

use crate::assembler;
use crate::descriptor::RestApi;
use crate::error::AssemblyResult;

/// Which parts of a request the generated validators check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Validate the body against the request model.
    pub body: bool,
    /// Validate required path and query parameters.
    pub parameters: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            body: true,
            parameters: true,
        }
    }
}

/// Everything needed to assemble one API.
///
/// # Example
///
/// ```
/// use portico::{ApiDefinition, HttpMethod, Integration, RouteDefinition};
///
/// let api = ApiDefinition::new("Status")
///     .route(
///         "/health",
///         RouteDefinition::methods([(HttpMethod::Get, Integration::mock("{\"statusCode\": 200}"))]),
///     )
///     .assemble()
///     .unwrap();
///
/// assert_eq!(api.method_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDefinition {
    /// API name.
    pub name: String,
    /// Stage name.
    pub stage_name: String,
    /// Global authorizer and CORS options.
    pub policy: GlobalPolicy,
    /// Routes by path, in declaration order.
    pub routes: IndexMap<String, RouteDefinition>,
    /// Validator settings.
    pub validation: ValidationSettings,
}

impl ApiDefinition {
    /// Creates an empty definition on the `dev` stage.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage_name: "dev".to_string(),
            policy: GlobalPolicy::default(),
            routes: IndexMap::new(),
            validation: ValidationSettings::default(),
        }
    }

    /// Sets the stage name.
    #[must_use]
    pub fn stage_name(mut self, stage_name: impl Into<String>) -> Self {
        self.stage_name = stage_name.into();
        self
    }

    /// Sets the global authorizer.
    #[must_use]
    pub fn authorizer(mut self, authorizer: Authorizer) -> Self {
        self.policy.authorizer = Some(authorizer);
        self
    }

    /// Sets the global CORS options.
    #[must_use]
    pub fn cors(mut self, cors: CorsOptions) -> Self {
        self.policy.cors = Some(cors);
        self
    }

    /// Replaces the global policy.
    #[must_use]
    pub fn policy(mut self, policy: GlobalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the validator settings.
    #[must_use]
    pub fn validation(mut self, validation: ValidationSettings) -> Self {
        self.validation = validation;
        self
    }

    /// Adds a route. Declaring the same path string again replaces the
    /// earlier route.
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, route: RouteDefinition) -> Self {
        let path = path.into();
        if self.routes.contains_key(&path) {
            warn!(api.path = %path, "route declared twice; keeping the last declaration");
        }
        self.routes.insert(path, route);
        self
    }

    /// Applies stage, validator and fallback CORS settings from configuration.
    #[must_use]
    pub fn with_config(mut self, config: &PorticoConfig) -> Self {
        self.stage_name.clone_from(&config.api.stage_name);
        self.validation = ValidationSettings {
            body: config.api.validate_request_body,
            parameters: config.api.validate_request_parameters,
        };
        if self.policy.cors.is_none() {
            self.policy.cors.clone_from(&config.cors);
        }
        self
    }

    /// Assembles the API.
    ///
    /// # Errors
    ///
    /// See [`AssemblyError`](crate::AssemblyError).
    pub fn assemble(&self) -> AssemblyResult<RestApi> {
        assembler::assemble(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::Integration;

    #[test]
    fn test_builder_defaults() {
        let api = ApiDefinition::new("Api");
        assert_eq!(api.stage_name, "dev");
        assert_eq!(api.validation, ValidationSettings::default());
        assert!(api.routes.is_empty());
    }

    #[test]
    fn test_route_replaces_same_path() {
        let api = ApiDefinition::new("Api")
            .route("/a", RouteDefinition::proxy(Integration::http("https://one.example")))
            .route("/b", RouteDefinition::proxy(Integration::http("https://two.example")))
            .route("/a", RouteDefinition::proxy(Integration::http("https://three.example")));
        assert_eq!(api.routes.keys().collect::<Vec<_>>(), vec!["/a", "/b"]);
        assert_eq!(
            api.routes["/a"],
            RouteDefinition::proxy(Integration::http("https://three.example"))
        );
    }

    #[test]
    fn test_with_config() {
        let mut config = PorticoConfig::production();
        config.api.validate_request_parameters = false;
        config.cors = Some(CorsOptions::default());

        let api = ApiDefinition::new("Api").with_config(&config);
        assert_eq!(api.stage_name, "prod");
        assert!(api.validation.body);
        assert!(!api.validation.parameters);
        assert_eq!(api.policy.cors, Some(CorsOptions::default()));

        let explicit = CorsOptions::default().allow_origins(["https://app.example"]);
        let api = ApiDefinition::new("Api").cors(explicit.clone()).with_config(&config);
        assert_eq!(api.policy.cors, Some(explicit));
    }
}
