//! Validation-schema documents.
//!
//! [`ValidationSchemaDocument`] mirrors the subset of JSON Schema (draft 4)
//! that API gateways accept for request and response models. Fields that are
//! unset are omitted when serialized, so an empty document serializes to `{}`
//! and matches any value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema draft 4 identifier, attached to top-level models.
pub const JSON_SCHEMA_DRAFT4: &str = "http://json-schema.org/draft-04/schema#";

/// JSON Schema primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// Null type.
    Null,
}

/// The `type` keyword: one type, or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaTypes {
    /// A single type.
    Single(SchemaType),
    /// Any of several types.
    Union(Vec<SchemaType>),
}

/// The `items` keyword: a homogeneous element schema or positional schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    /// Every element matches this schema.
    Single(Box<ValidationSchemaDocument>),
    /// Element `i` matches schema `i`.
    Tuple(Vec<ValidationSchemaDocument>),
}

/// A validation-schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSchemaDocument {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaTypes>,
    /// Schema format (e.g., "date-time", "int64").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Enum values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, ValidationSchemaDocument>,
    /// Required properties, in field declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,
    /// Minimum array length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "minItems")]
    pub min_items: Option<usize>,
    /// oneOf schemas.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "oneOf")]
    pub one_of: Vec<ValidationSchemaDocument>,
    /// allOf schemas.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "allOf")]
    pub all_of: Vec<ValidationSchemaDocument>,
    /// Negated schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<ValidationSchemaDocument>>,
}

impl ValidationSchemaDocument {
    /// Create a document of a single type.
    #[must_use]
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(SchemaTypes::Single(schema_type)),
            ..Default::default()
        }
    }

    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// Create a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    /// Create an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    /// Create a null schema.
    #[must_use]
    pub fn null() -> Self {
        Self::of_type(SchemaType::Null)
    }

    /// Create an object schema.
    #[must_use]
    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: ValidationSchemaDocument) -> Self {
        Self {
            schema_type: Some(SchemaTypes::Single(SchemaType::Array)),
            items: Some(SchemaItems::Single(Box::new(items))),
            ..Default::default()
        }
    }

    /// Create a schema that matches anything.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Create a schema that matches nothing.
    #[must_use]
    pub fn never() -> Self {
        Self {
            not: Some(Box::new(Self::any())),
            ..Default::default()
        }
    }

    /// Set the format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the enum values.
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = values;
        self
    }

    /// Add a property to an object schema.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: ValidationSchemaDocument) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property as required.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Returns `true` if this document places no constraint at all.
    #[must_use]
    pub fn is_any(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_builders() {
        let string = ValidationSchemaDocument::string();
        assert_eq!(
            string.schema_type,
            Some(SchemaTypes::Single(SchemaType::String))
        );

        let array = ValidationSchemaDocument::array(ValidationSchemaDocument::string());
        assert!(matches!(array.items, Some(SchemaItems::Single(_))));

        let object = ValidationSchemaDocument::object()
            .property("name", ValidationSchemaDocument::string())
            .required_property("name");
        assert!(object.properties.contains_key("name"));
        assert_eq!(object.required, vec!["name".to_string()]);
    }

    #[test]
    fn test_any_serializes_empty() {
        let any = ValidationSchemaDocument::any();
        assert!(any.is_any());
        assert_eq!(serde_json::to_value(&any).unwrap(), json!({}));
    }

    #[test]
    fn test_never_serializes_negated_empty() {
        let never = ValidationSchemaDocument::never();
        assert!(!never.is_any());
        assert_eq!(serde_json::to_value(&never).unwrap(), json!({ "not": {} }));
    }

    #[test]
    fn test_type_union_serialization() {
        let doc = ValidationSchemaDocument {
            schema_type: Some(SchemaTypes::Union(vec![
                SchemaType::String,
                SchemaType::Number,
            ])),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "type": ["string", "number"] })
        );
    }

    #[test]
    fn test_tuple_items_serialization() {
        let doc = ValidationSchemaDocument {
            schema_type: Some(SchemaTypes::Single(SchemaType::Array)),
            items: Some(SchemaItems::Tuple(vec![
                ValidationSchemaDocument::string(),
                ValidationSchemaDocument::number(),
            ])),
            min_items: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "array",
                "items": [{ "type": "string" }, { "type": "number" }],
                "minItems": 2
            })
        );
    }

    #[test]
    fn test_document_deserializes_back() {
        let value = json!({
            "type": "object",
            "properties": { "tags": { "type": "array", "items": { "type": "string" } } },
            "required": ["tags"]
        });
        let doc: ValidationSchemaDocument = serde_json::from_value(value).unwrap();
        assert_eq!(doc.required, vec!["tags".to_string()]);
        assert!(matches!(
            doc.properties["tags"].items,
            Some(SchemaItems::Single(_))
        ));
    }
}
