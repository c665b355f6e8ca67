//! Test fixtures for Portico development and testing.
//!
//! Ready-made handles, schemas and definitions shared by the tests of the
//! Portico crates.
//!
//! # Example
//!
//! ```
//! use portico_core::fixtures;
//!
//! let definition = fixtures::get_user_definition();
//! assert_eq!(definition.shape(), "compute");
//! ```

use portico_schema::TypeSchema;

use crate::definition::{ComputeDefinition, ResourceDefinition, ResponseSpec, Responses, RouteAuth};
use crate::handles::{Authorizer, ComputeUnit, Integration};
use crate::policy::{CorsOptions, GlobalPolicy};

/// A compute unit named `template-lambda`.
#[must_use]
pub fn template_function() -> ComputeUnit {
    ComputeUnit::new("template-lambda")
        .with_arn("arn:aws:lambda:eu-central-1:123456789012:function:template-lambda")
}

/// A user-pool authorizer.
#[must_use]
pub fn user_pool_authorizer() -> Authorizer {
    Authorizer::new("user-pool-authorizer")
        .with_identity_source("method.request.header.Authorization")
}

/// Global policy with the user-pool authorizer and permissive CORS.
#[must_use]
pub fn global_policy() -> GlobalPolicy {
    GlobalPolicy::default()
        .with_authorizer(user_pool_authorizer())
        .with_cors(CorsOptions::default())
}

/// Schema of a user.
///
/// ```text
/// { id: string, email: string, name?: string, role: "admin" | "user" }
/// ```
#[must_use]
pub fn user_schema() -> TypeSchema {
    TypeSchema::object([
        ("id", TypeSchema::string()),
        ("email", TypeSchema::string()),
        ("name", TypeSchema::string().optional()),
        (
            "role",
            TypeSchema::union([TypeSchema::literal("admin"), TypeSchema::literal("user")]),
        ),
    ])
}

/// Schema of a user creation request.
#[must_use]
pub fn create_user_schema() -> TypeSchema {
    TypeSchema::object([
        ("email", TypeSchema::string()),
        ("name", TypeSchema::string().optional()),
    ])
}

/// Schema of an error body.
#[must_use]
pub fn error_schema() -> TypeSchema {
    TypeSchema::object([("message", TypeSchema::string())])
}

/// `GET /users/{userId}`: compute-backed, one shorthand response.
#[must_use]
pub fn get_user_definition() -> ResourceDefinition {
    ComputeDefinition::new(template_function())
        .responses(Responses::Single(user_schema()))
        .into()
}

/// `POST /users`: compute-backed with a request model and two responses.
#[must_use]
pub fn create_user_definition() -> ResourceDefinition {
    ComputeDefinition::new(template_function())
        .request(create_user_schema())
        .responses(Responses::List(vec![
            ResponseSpec {
                status_code: 201,
                schema: user_schema(),
            },
            ResponseSpec {
                status_code: 400,
                schema: error_schema(),
            },
        ]))
        .scopes(["users/write"])
        .into()
}

/// An open compute-backed definition with a query parameter.
#[must_use]
pub fn public_search_definition() -> ResourceDefinition {
    ComputeDefinition::new(template_function())
        .query_param("q", true)
        .auth(RouteAuth::Disabled)
        .into()
}

/// A raw HTTP proxy integration.
#[must_use]
pub fn http_backend() -> Integration {
    Integration::http("https://backend.example.com/{proxy}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_schema::convert_model;

    #[test]
    fn test_fixture_schemas_convert() {
        for schema in [user_schema(), create_user_schema(), error_schema()] {
            assert!(convert_model(&schema).is_ok());
        }
    }

    #[test]
    fn test_fixture_definitions_have_expected_shapes() {
        assert_eq!(get_user_definition().shape(), "compute");
        assert_eq!(
            create_user_definition()
                .metadata()
                .and_then(|m| m.authorization_scopes.clone()),
            Some(vec!["users/write".to_string()])
        );
        assert_eq!(
            public_search_definition().metadata().map(|m| &m.auth),
            Some(&RouteAuth::Disabled)
        );
    }
}
