//! The assembly pass.
//!
//! Routes are processed in declaration order. For each one the path is
//! inserted into the resource tree, then every declared method is resolved,
//! bound to its policy and attached to the node together with its request
//! validator and models:
//!
//! ```text
//! path ──► PathTree::insert ──► node
//!                                 │
//!   definition ──► resolve ───────┤ integration
//!              ──► bind ──────────┤ authorization
//!              ──► convert_model ─┤ models
//!   naming ───────────────────────┘ validator / model names
//! ```
//!
//! The pass owns everything it builds; the result is handed out only when
//! every route has been attached.

use std::time::Instant;

use indexmap::IndexMap;
use portico_core::naming::{
    artifact_name, response_model_role, REQUEST_MODEL, REQUEST_VALIDATOR, RESPONSE_MODEL,
};
use portico_core::{
    bind, register_preflight, resolve, CorsOptions, HttpMethod, Integration, ResolveContext,
    ResourceDefinition, RouteDefinition, APPLICATION_JSON,
};
use portico_schema::{convert_model, TypeSchema};
use portico_telemetry::metrics;
use portico_tree::{path_params, NodeId, PathTree};
use tracing::{debug, error, info, warn};

use crate::api::ApiDefinition;
use crate::descriptor::{
    MethodDescriptor, MethodResponse, Model, RequestValidator, ResourceAttachments, RestApi,
};
use crate::error::{AssemblyError, AssemblyResult};

/// Segment of the child resource a proxy route forwards through.
pub const PROXY_SEGMENT: &str = "{proxy+}";

/// Status code of CORS preflight responses.
pub const PREFLIGHT_STATUS: u16 = 204;

/// Assembles `definition` into a [`RestApi`].
///
/// # Errors
///
/// Returns the first [`AssemblyError`] encountered; nothing is returned for
/// a partially assembled API.
pub fn assemble(definition: &ApiDefinition) -> AssemblyResult<RestApi> {
    let started = Instant::now();
    info!(
        api.name = %definition.name,
        routes = definition.routes.len(),
        "assembling API"
    );

    let result = Assembler::new(definition).run();

    match &result {
        Ok(api) => {
            metrics::record_duration(started.elapsed());
            info!(
                api.name = %api.name,
                resources = api.resources.len(),
                methods = api.method_count(),
                models = api.models.len(),
                validators = api.validators.len(),
                duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "API assembled"
            );
        }
        Err(e) => {
            metrics::record_failure(e.kind());
            error!(api.name = %definition.name, error = %e, "API assembly failed");
        }
    }

    result
}

struct Assembler<'a> {
    definition: &'a ApiDefinition,
    tree: PathTree<ResourceAttachments>,
    models: IndexMap<String, Model>,
    validators: IndexMap<String, RequestValidator>,
}

impl<'a> Assembler<'a> {
    fn new(definition: &'a ApiDefinition) -> Self {
        Self {
            definition,
            tree: PathTree::new(),
            models: IndexMap::new(),
            validators: IndexMap::new(),
        }
    }

    fn run(mut self) -> AssemblyResult<RestApi> {
        let definition = self.definition;
        if let Some(cors) = &definition.policy.cors {
            cors.validate()?;
        }

        for (path, route) in &definition.routes {
            let node = self.tree.insert(path);
            match route {
                RouteDefinition::Proxy(definition) => self.attach_proxy(node, definition)?,
                RouteDefinition::Methods(methods) => {
                    self.attach_methods(node, path, methods)?;
                }
            }
        }

        Ok(RestApi {
            name: definition.name.clone(),
            stage_name: definition.stage_name.clone(),
            resources: self.tree,
            models: self.models,
            validators: self.validators,
        })
    }

    /// `ANY` on the node and on a greedy child, both passing requests through.
    fn attach_proxy(&mut self, node: NodeId, definition: &ResourceDefinition) -> AssemblyResult<()> {
        let integration = resolve(definition, &ResolveContext::SkipTemplating);
        let child = self.tree.insert_at(node, PROXY_SEGMENT);

        for target in [node, child] {
            let method = MethodDescriptor::open(HttpMethod::Any, integration.clone());
            self.attach(target, method)?;
        }
        Ok(())
    }

    fn attach_methods(
        &mut self,
        node: NodeId,
        path: &str,
        methods: &IndexMap<HttpMethod, ResourceDefinition>,
    ) -> AssemblyResult<()> {
        for method in methods.keys().filter(|m| !m.is_route_method()) {
            warn!(api.path = %path, http.method = %method, "routes cannot declare this method; skipped");
        }

        let api = self.definition;
        let params = path_params(path);

        for method in HttpMethod::ROUTE_METHODS {
            let Some(definition) = methods.get(&method) else {
                continue;
            };

            let normalized = self.tree.path_of(node);
            if self.tree.payload(node).methods.contains_key(&method) {
                return Err(AssemblyError::DuplicateMethod {
                    method,
                    path: normalized,
                });
            }

            if let Some(cors) = &api.policy.cors {
                self.request_preflight(node, cors)?;
            }

            let descriptor = self.describe(method, path, &params, definition)?;
            self.attach(node, descriptor)?;
        }
        Ok(())
    }

    fn describe(
        &mut self,
        method: HttpMethod,
        path: &str,
        params: &[String],
        definition: &ResourceDefinition,
    ) -> AssemblyResult<MethodDescriptor> {
        let name = |role: &str| artifact_name(method.as_str(), path, role);

        let integration = resolve(definition, &ResolveContext::PathParams(params.to_vec()));
        let mut descriptor = MethodDescriptor::open(method, integration);

        descriptor.request_parameters = params
            .iter()
            .map(|p| (format!("method.request.path.{p}"), true))
            .chain(
                definition
                    .query_params()
                    .into_iter()
                    .flatten()
                    .map(|(q, required)| (format!("method.request.querystring.{q}"), *required)),
            )
            .collect();

        descriptor.request_validator = Some(self.add_validator(name(REQUEST_VALIDATOR))?);

        if let Some(metadata) = definition.metadata() {
            if let Some(request) = &metadata.request {
                let model = self.add_model(name(REQUEST_MODEL), request)?;
                descriptor
                    .request_models
                    .insert(APPLICATION_JSON.to_string(), model);
            }

            if let Some(responses) = &metadata.responses {
                for (status_code, schema) in responses.entries() {
                    let role = if responses.is_shorthand() {
                        RESPONSE_MODEL.to_string()
                    } else {
                        response_model_role(status_code)
                    };
                    let model = self.add_model(name(&role), schema)?;
                    descriptor.method_responses.push(MethodResponse {
                        status_code,
                        response_models: IndexMap::from([(APPLICATION_JSON.to_string(), model)]),
                        response_headers: IndexMap::new(),
                    });
                }
            }
        }

        if let Some(policy) = bind(&self.definition.policy, definition) {
            descriptor.authorization_type = policy.authorization_type();
            descriptor.authorizer = policy.authorizer;
            descriptor.authorization_scopes = policy.authorization_scopes;
        }

        Ok(descriptor)
    }

    /// Registers the preflight once per node; later requests are no-ops.
    fn request_preflight(&mut self, node: NodeId, cors: &CorsOptions) -> AssemblyResult<()> {
        if !register_preflight(&mut self.tree.payload_mut(node).cors, cors) {
            return Ok(());
        }

        let mut preflight = MethodDescriptor::open(
            HttpMethod::Options,
            Integration::mock(format!("{{\"statusCode\": {PREFLIGHT_STATUS}}}")),
        );
        preflight.method_responses.push(MethodResponse {
            status_code: PREFLIGHT_STATUS,
            response_models: IndexMap::new(),
            response_headers: cors.preflight_headers(),
        });

        metrics::record_preflight();
        self.attach(node, preflight)
    }

    fn attach(&mut self, node: NodeId, method: MethodDescriptor) -> AssemblyResult<()> {
        let path = self.tree.path_of(node);
        let http_method = method.http_method;

        let methods = &mut self.tree.payload_mut(node).methods;
        if methods.contains_key(&http_method) {
            return Err(AssemblyError::DuplicateMethod {
                method: http_method,
                path,
            });
        }

        metrics::record_method(http_method.as_str(), method.integration.type_name());
        info!(
            api.path = %path,
            http.method = %http_method,
            integration = method.integration.type_name(),
            authorization = method.authorization_type,
            "method attached"
        );
        methods.insert(http_method, method);
        Ok(())
    }

    fn add_validator(&mut self, name: String) -> AssemblyResult<String> {
        if self.validators.contains_key(&name) || self.models.contains_key(&name) {
            return Err(AssemblyError::DuplicateArtifact { name });
        }

        debug!(artifact = %name, "request validator created");
        let validator = RequestValidator {
            name: name.clone(),
            validate_request_body: self.definition.validation.body,
            validate_request_parameters: self.definition.validation.parameters,
        };
        self.validators.insert(name.clone(), validator);
        Ok(name)
    }

    fn add_model(&mut self, name: String, schema: &TypeSchema) -> AssemblyResult<String> {
        if self.models.contains_key(&name) || self.validators.contains_key(&name) {
            return Err(AssemblyError::DuplicateArtifact { name });
        }

        let document = convert_model(schema)?;
        debug!(artifact = %name, "model created");
        metrics::record_models(1);
        self.models
            .insert(name.clone(), Model::new(name.clone(), APPLICATION_JSON, document));
        Ok(name)
    }
}
