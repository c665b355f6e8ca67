//! End-to-end assembly tests.
//!
//! These build a small but complete API through the builder and check the
//! descriptor the provisioning side would receive:
//!
//! 1. Raw integration route with the global authorizer
//! 2. Catch-all proxy route
//! 3. Compute route with path/query parameters, request and response models
//! 4. CORS preflights on every resource with explicit methods

use portico::prelude::*;
use portico::core::fixtures;
use proptest::prelude::*;
use serde_json::Value;

/// Builds the sample API used across these tests.
fn sample_api() -> ApiDefinition {
    let payload = TypeSchema::union([
        TypeSchema::object([("kind", TypeSchema::literal("a")), ("a", TypeSchema::string())]),
        TypeSchema::object([("kind", TypeSchema::literal("b")), ("b", TypeSchema::number())]),
    ]);
    let user = TypeSchema::object([
        ("name", TypeSchema::string()),
        ("email", TypeSchema::string()),
        (
            "type",
            TypeSchema::union([TypeSchema::literal("admin"), TypeSchema::literal("user")]),
        ),
    ]);
    let params_route = ComputeDefinition::new(fixtures::template_function())
        .query_param("someQueryParam", true)
        .request(TypeSchema::object([
            ("name", TypeSchema::string()),
            ("users", TypeSchema::array(user)),
            ("payload", payload),
        ]))
        .responses(Responses::Single(TypeSchema::object([(
            "message",
            TypeSchema::string(),
        )])));

    ApiDefinition::new("ExampleApi")
        .authorizer(fixtures::user_pool_authorizer())
        .cors(CorsOptions::default().allow_origins(["https://app.example.com"]))
        .route(
            "/lambda/base",
            RouteDefinition::methods([(
                HttpMethod::Get,
                Integration::lambda(fixtures::template_function()),
            )]),
        )
        .route(
            "/proxy/base",
            RouteDefinition::proxy(ComputeDefinition::new(fixtures::template_function())),
        )
        .route(
            "/lambda/params/{paramId}",
            RouteDefinition::methods([(HttpMethod::Post, params_route)]),
        )
}

#[test]
fn test_sample_api_resources() {
    let api = sample_api().assemble().unwrap();

    for path in [
        "/",
        "/lambda",
        "/lambda/base",
        "/lambda/params",
        "/lambda/params/{paramId}",
        "/proxy",
        "/proxy/base",
        "/proxy/base/{proxy+}",
    ] {
        assert!(api.resource(path).is_some(), "missing resource {path}");
    }
    assert_eq!(api.resources.len(), 8);

    // Intermediate resources carry nothing.
    assert!(api.resource("/lambda/params").unwrap().methods.is_empty());
    assert!(api.resource("/lambda/params").unwrap().cors.is_none());

    assert_eq!(api.method_count(), 6);
}

#[test]
fn test_sample_api_authorization() {
    let api = sample_api().assemble().unwrap();

    let get = api.method("/lambda/base", HttpMethod::Get).unwrap();
    assert_eq!(get.authorization_type, "COGNITO_USER_POOLS");
    assert_eq!(get.authorizer, Some(fixtures::user_pool_authorizer()));

    let preflight = api.method("/lambda/base", HttpMethod::Options).unwrap();
    assert_eq!(preflight.authorization_type, "NONE");
    assert!(preflight.authorizer.is_none());

    let proxy = api.method("/proxy/base/{proxy+}", HttpMethod::Any).unwrap();
    assert_eq!(proxy.authorization_type, "NONE");
    assert!(proxy.request_validator.is_none());
}

#[test]
fn test_sample_api_compute_route() {
    let api = sample_api().assemble().unwrap();
    let post = api
        .method("/lambda/params/{paramId}", HttpMethod::Post)
        .unwrap();

    assert_eq!(
        post.request_parameters.keys().collect::<Vec<_>>(),
        vec![
            "method.request.path.paramId",
            "method.request.querystring.someQueryParam"
        ]
    );
    assert_eq!(
        post.request_validator.as_deref(),
        Some("PostLambdaParamsParamidRequestValidator")
    );
    assert_eq!(
        post.request_models["application/json"],
        "PostLambdaParamsParamidRequestModel"
    );
    assert_eq!(post.method_responses.len(), 1);
    assert_eq!(post.method_responses[0].status_code, 200);
    assert_eq!(
        post.method_responses[0].response_models["application/json"],
        "PostLambdaParamsParamidResponseModel"
    );

    let Integration::Lambda(lambda) = &post.integration else {
        panic!("expected lambda integration");
    };
    assert_eq!(
        lambda.request_parameters["integration.request.path.paramId"],
        "method.request.path.paramId"
    );
    assert!(lambda.request_templates.contains_key("application/json"));
}

#[test]
fn test_sample_api_models() {
    let api = sample_api().assemble().unwrap();
    assert_eq!(
        api.models.keys().collect::<Vec<_>>(),
        vec![
            "PostLambdaParamsParamidRequestModel",
            "PostLambdaParamsParamidResponseModel"
        ]
    );

    let json: Value = serde_json::from_str(&api.to_json(false).unwrap()).unwrap();
    let request = &json["models"]["PostLambdaParamsParamidRequestModel"]["schema"];
    assert_eq!(request["$schema"], "http://json-schema.org/draft-04/schema#");
    assert_eq!(request["type"], "object");
    assert_eq!(
        request["required"],
        serde_json::json!(["name", "users", "payload"])
    );
    assert_eq!(request["properties"]["users"]["type"], "array");
}

#[test]
fn test_sample_api_preflights() {
    let api = sample_api().assemble().unwrap();

    for path in ["/lambda/base", "/lambda/params/{paramId}"] {
        let resource = api.resource(path).unwrap();
        assert_eq!(resource.methods.keys().next(), Some(&HttpMethod::Options));
        let preflight = &resource.methods[&HttpMethod::Options];
        assert_eq!(preflight.method_responses[0].status_code, 204);
        assert_eq!(
            preflight.method_responses[0].response_headers["Access-Control-Allow-Origin"],
            "https://app.example.com"
        );
    }

    assert!(api.resource("/proxy/base").unwrap().cors.is_none());
}

#[test]
fn test_assembly_is_deterministic() {
    let first = sample_api().assemble().unwrap().to_json(true).unwrap();
    let second = sample_api().assemble().unwrap().to_json(true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_first_error_aborts_assembly() {
    let api = sample_api().route(
        "/broken",
        RouteDefinition::methods([(
            HttpMethod::Put,
            ComputeDefinition::new(ComputeUnit::new("fn")).request(TypeSchema::string()),
        )]),
    );
    assert!(matches!(
        api.assemble(),
        Err(AssemblyError::Schema(_))
    ));
}

#[test]
fn test_sibling_captures_assemble() {
    let mock = || {
        RouteDefinition::methods([(HttpMethod::Get, Integration::mock("{\"statusCode\": 200}"))])
    };
    let api = ApiDefinition::new("Siblings")
        .route("/a/{x}", mock())
        .route("/a/{y}", mock())
        .assemble()
        .unwrap();

    assert!(api.method("/a/{x}", HttpMethod::Get).is_some());
    assert!(api.method("/a/{y}", HttpMethod::Get).is_some());
    assert_eq!(api.resources.len(), 4);
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-h]{1,4}",
        1 => Just("{id}".to_string()),
    ]
}

fn route_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..4).prop_map(|segments| {
        segments
            .into_iter()
            .fold(String::new(), |path, segment| format!("{path}/{segment}"))
    })
}

proptest! {
    #[test]
    fn test_random_apis_assemble_deterministically(paths in prop::collection::vec(route_path(), 1..8)) {
        let build = || {
            paths.iter().fold(ApiDefinition::new("Random"), |api, path| {
                api.route(
                    path.as_str(),
                    RouteDefinition::methods([(
                        HttpMethod::Get,
                        Integration::mock("{\"statusCode\": 200}"),
                    )]),
                )
            })
        };

        let first = build().assemble().unwrap();
        let second = build().assemble().unwrap();
        prop_assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());

        for path in &paths {
            prop_assert!(first.method(path, HttpMethod::Get).is_some());
        }
    }
}
