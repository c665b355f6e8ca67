//! End-to-end checks of definition probing, resolution and policy binding.

use portico_core::{
    bind, fixtures, resolve, Authorizer, ComputeUnit, CoreError, GlobalPolicy, Integration,
    ResolveContext, ResourceDefinition, APPLICATION_JSON,
};
use serde_json::json;

fn path_params(names: &[&str]) -> ResolveContext {
    ResolveContext::PathParams(names.iter().map(|s| (*s).to_string()).collect())
}

#[test]
fn test_compute_definition_remaps_path_and_query() {
    let def = ResourceDefinition::probe(&json!({
        "function": "F",
        "queryParams": { "q": true }
    }))
    .unwrap();

    let Integration::Lambda(lambda) = resolve(&def, &path_params(&["id"])) else {
        panic!("expected lambda integration");
    };
    assert_eq!(lambda.function, ComputeUnit::new("F"));
    assert!(lambda.request_parameters.contains_key("integration.request.path.id"));
    assert!(lambda.request_parameters.contains_key("integration.request.querystring.q"));

    let template = &lambda.request_templates[APPLICATION_JSON];
    assert!(template.contains("$input.params().path.get('id')"));
    assert!(template.contains("$input.params().querystring.get('q')"));
}

#[test]
fn test_wrapped_integration_is_returned_unchanged() {
    let raw = json!({ "type": "http", "uri": "https://backend.example.com" });
    let def = ResourceDefinition::probe(&json!({ "integration": raw.clone(), "auth": false })).unwrap();

    let expected: Integration = serde_json::from_value(raw).unwrap();
    assert_eq!(resolve(&def, &path_params(&["id"])), expected);
}

#[test]
fn test_empty_definition_is_unrecognized() {
    let err = ResourceDefinition::probe(&json!({})).unwrap_err();
    assert!(matches!(err, CoreError::UnrecognizedResourceDefinition { .. }));
}

#[test]
fn test_auth_precedence() {
    let global = GlobalPolicy::default().with_authorizer(Authorizer::new("G"));

    let inherit = ResourceDefinition::probe(&json!({ "function": "F" })).unwrap();
    assert_eq!(
        bind(&global, &inherit).and_then(|p| p.authorizer),
        Some(Authorizer::new("G"))
    );

    let open = ResourceDefinition::probe(&json!({ "function": "F", "auth": false })).unwrap();
    assert_eq!(bind(&global, &open), None);

    let custom = ResourceDefinition::probe(&json!({ "function": "F", "auth": { "id": "H" } })).unwrap();
    assert_eq!(
        bind(&global, &custom).and_then(|p| p.authorizer),
        Some(Authorizer::new("H"))
    );
}

#[test]
fn test_fixture_definitions_bind_against_global_policy() {
    let global = fixtures::global_policy();

    let policy = bind(&global, &fixtures::create_user_definition()).unwrap();
    assert_eq!(policy.authorizer, Some(fixtures::user_pool_authorizer()));
    assert_eq!(policy.authorization_scopes, Some(vec!["users/write".to_string()]));
    assert_eq!(policy.authorization_type(), "COGNITO_USER_POOLS");

    assert!(bind(&global, &fixtures::public_search_definition()).is_none());

    let raw = ResourceDefinition::Integration(fixtures::http_backend());
    assert_eq!(bind(&global, &raw).unwrap().authorization_scopes, None);
}
