//! The assembled API descriptor.
//!
//! A [`RestApi`] is what the provisioning collaborator consumes: the
//! resource tree with every method attached, plus the models and request
//! validators those methods reference by name. It is immutable once built
//! and serializes to JSON.

use indexmap::IndexMap;
use portico_core::{Authorizer, CorsOptions, HttpMethod, Integration};
use portico_schema::{ValidationSchemaDocument, JSON_SCHEMA_DRAFT4};
use portico_tree::PathTree;
use serde::Serialize;

/// An assembled REST API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestApi {
    /// API name.
    pub name: String,
    /// Stage name. Carried as metadata only.
    pub stage_name: String,
    /// Resource tree rooted at `/`.
    pub resources: PathTree<ResourceAttachments>,
    /// Models by name, in creation order.
    pub models: IndexMap<String, Model>,
    /// Request validators by name, in creation order.
    pub validators: IndexMap<String, RequestValidator>,
}

impl RestApi {
    /// Attachments of the resource at `path`.
    #[must_use]
    pub fn resource(&self, path: &str) -> Option<&ResourceAttachments> {
        self.resources
            .resolve(path)
            .map(|id| self.resources.payload(id))
    }

    /// The method attached to the resource at `path`.
    #[must_use]
    pub fn method(&self, path: &str, method: HttpMethod) -> Option<&MethodDescriptor> {
        self.resource(path).and_then(|r| r.methods.get(&method))
    }

    /// Total number of attached methods, preflights included.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.resources
            .iter()
            .map(|(_, node)| node.payload().methods.len())
            .sum()
    }

    /// Renders the descriptor as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; the descriptor types themselves always
    /// serialize.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// What is attached to one resource node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAttachments {
    /// Methods in attachment order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub methods: IndexMap<HttpMethod, MethodDescriptor>,
    /// CORS options of the preflight method, once registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsOptions>,
}

/// A method attached to a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Backend integration.
    pub integration: Integration,
    /// `NONE`, `COGNITO_USER_POOLS` or `CUSTOM`.
    pub authorization_type: &'static str,
    /// Guarding authorizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<Authorizer>,
    /// Scopes the authorizer must grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_scopes: Option<Vec<String>>,
    /// Declared request parameters and whether each is required.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub request_parameters: IndexMap<String, bool>,
    /// Name of the request validator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_validator: Option<String>,
    /// Request model names by content type.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub request_models: IndexMap<String, String>,
    /// Declared responses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub method_responses: Vec<MethodResponse>,
}

impl MethodDescriptor {
    /// A method with no authorization, parameters or models.
    #[must_use]
    pub fn open(http_method: HttpMethod, integration: Integration) -> Self {
        Self {
            http_method,
            integration,
            authorization_type: "NONE",
            authorizer: None,
            authorization_scopes: None,
            request_parameters: IndexMap::new(),
            request_validator: None,
            request_models: IndexMap::new(),
            method_responses: Vec::new(),
        }
    }
}

/// A declared method response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response model names by content type.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub response_models: IndexMap<String, String>,
    /// Static response headers.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub response_headers: IndexMap<String, String>,
}

/// A named validation model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model name.
    pub name: String,
    /// Content type the model applies to.
    pub content_type: String,
    /// The schema, tagged with its draft.
    pub schema: ModelSchema,
}

impl Model {
    /// Creates a draft-4 model for `content_type`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        document: ValidationSchemaDocument,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            schema: ModelSchema {
                draft: JSON_SCHEMA_DRAFT4,
                document,
            },
        }
    }
}

/// A validation document with its `$schema` marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSchema {
    /// Draft URI.
    #[serde(rename = "$schema")]
    pub draft: &'static str,
    /// The document.
    #[serde(flatten)]
    pub document: ValidationSchemaDocument,
}

/// A named request validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestValidator {
    /// Validator name.
    pub name: String,
    /// Validate the body against the request model.
    pub validate_request_body: bool,
    /// Validate required path and query parameters.
    pub validate_request_parameters: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::APPLICATION_JSON;
    use serde_json::json;

    #[test]
    fn test_model_serializes_with_draft_marker() {
        let model = Model::new(
            "PostUsersRequestModel",
            APPLICATION_JSON,
            ValidationSchemaDocument::object().property("name", ValidationSchemaDocument::string()),
        );
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["contentType"], "application/json");
        assert_eq!(value["schema"]["$schema"], JSON_SCHEMA_DRAFT4);
        assert_eq!(value["schema"]["type"], "object");
        assert_eq!(value["schema"]["properties"]["name"], json!({ "type": "string" }));
    }

    #[test]
    fn test_open_method_omits_empty_fields() {
        let method = MethodDescriptor::open(HttpMethod::Any, Integration::http("https://example.com"));
        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["httpMethod"], "ANY");
        assert_eq!(value["authorizationType"], "NONE");
        assert!(value.get("requestParameters").is_none());
        assert!(value.get("methodResponses").is_none());
    }
}
