//! Resolution of resource definitions into concrete integrations.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::definition::{ComputeDefinition, ResourceDefinition};
use crate::handles::{Integration, LambdaIntegration, APPLICATION_JSON};

/// What the resolver knows about the route being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveContext {
    /// Path parameter names of the route, in path order.
    PathParams(Vec<String>),
    /// Pass the raw request through untouched (catch-all routes).
    SkipTemplating,
}

/// Produces the integration serving a definition.
///
/// Existing integrations are returned as they are, metadata aside. Compute
/// definitions get a proxy integration for their unit; with
/// [`ResolveContext::PathParams`] the integration also maps path and query
/// parameters through and wraps the request in a uniform
/// `{params, query, body}` envelope.
#[must_use]
pub fn resolve(definition: &ResourceDefinition, context: &ResolveContext) -> Integration {
    match definition {
        ResourceDefinition::Integration(integration)
        | ResourceDefinition::Wrapped { integration, .. } => integration.clone(),
        ResourceDefinition::Compute(compute) => Integration::Lambda(derive(compute, context)),
    }
}

fn derive(compute: &ComputeDefinition, context: &ResolveContext) -> LambdaIntegration {
    let mut lambda = LambdaIntegration::new(compute.function.clone()).with_options(&compute.options);

    let ResolveContext::PathParams(path_params) = context else {
        return lambda;
    };

    lambda.request_parameters = request_parameters(path_params, &compute.query_params);
    lambda.request_templates.insert(
        APPLICATION_JSON.to_string(),
        request_template(path_params, &compute.query_params),
    );
    lambda
}

fn request_parameters(
    path_params: &[String],
    query_params: &IndexMap<String, bool>,
) -> IndexMap<String, String> {
    let path = path_params.iter().map(|p| {
        (
            format!("integration.request.path.{p}"),
            format!("method.request.path.{p}"),
        )
    });
    let query = query_params.keys().map(|q| {
        (
            format!("integration.request.querystring.{q}"),
            format!("method.request.querystring.{q}"),
        )
    });
    path.chain(query).collect()
}

fn request_template(path_params: &[String], query_params: &IndexMap<String, bool>) -> String {
    let params: Map<String, Value> = path_params
        .iter()
        .map(|p| (p.clone(), Value::String(format!("$input.params().path.get('{p}')"))))
        .collect();
    let query: Map<String, Value> = query_params
        .keys()
        .map(|q| {
            (
                q.clone(),
                Value::String(format!("$input.params().querystring.get('{q}')")),
            )
        })
        .collect();

    json!({
        "params": params,
        "query": query,
        "body": "$input.json(\"$\")",
    })
    .to_string()
}
