//! Conversion from [`TypeSchema`] to [`ValidationSchemaDocument`].
//!
//! The conversion is a single exhaustive match over the schema kinds. It is
//! pure: the same input always yields the same document, or the same error.

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::{SchemaItems, SchemaType, SchemaTypes, ValidationSchemaDocument};
use crate::error::{SchemaError, SchemaResult};
use crate::types::{NativeEnumValue, TypeSchema};

/// Converts a type schema into a validation-schema document.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedSchemaConstruct`] if the schema (or any
/// nested schema) is a record, map, set, function, or a literal that is an
/// array or object.
///
/// # Non-termination
///
/// Lazy schemas are forced and converted without cycle detection. A lazy
/// schema that resolves back to itself recurses until the stack is exhausted.
pub fn convert(schema: &TypeSchema) -> SchemaResult<ValidationSchemaDocument> {
    match schema {
        TypeSchema::String => Ok(ValidationSchemaDocument::string()),
        TypeSchema::Number => Ok(ValidationSchemaDocument::number()),
        TypeSchema::Boolean => Ok(ValidationSchemaDocument::boolean()),
        TypeSchema::BigInt => Ok(ValidationSchemaDocument::integer().with_format("int64")),
        TypeSchema::Literal { value } => convert_literal(schema, value),
        TypeSchema::Enum { values } => Ok(ValidationSchemaDocument::string()
            .with_enum(values.iter().cloned().map(Value::String).collect())),
        TypeSchema::NativeEnum { values } => Ok(convert_native_enum(values)),
        TypeSchema::Object { fields } => convert_object(fields),
        TypeSchema::Array { element } => Ok(ValidationSchemaDocument::array(convert(element)?)),
        TypeSchema::Tuple { elements } => {
            let items = elements.iter().map(convert).collect::<SchemaResult<Vec<_>>>()?;
            Ok(ValidationSchemaDocument {
                schema_type: Some(SchemaTypes::Single(SchemaType::Array)),
                min_items: Some(items.len()),
                items: Some(SchemaItems::Tuple(items)),
                ..Default::default()
            })
        }
        // The discriminator does not appear in the output; each variant is
        // matched on its own shape.
        TypeSchema::Union { variants } | TypeSchema::DiscriminatedUnion { variants, .. } => {
            Ok(ValidationSchemaDocument {
                one_of: variants.iter().map(convert).collect::<SchemaResult<_>>()?,
                ..Default::default()
            })
        }
        TypeSchema::Intersection { left, right } => Ok(ValidationSchemaDocument {
            all_of: vec![convert(left)?, convert(right)?],
            ..Default::default()
        }),
        TypeSchema::Optional { inner } | TypeSchema::Nullable { inner } => convert(inner),
        TypeSchema::Lazy(lazy) => convert(&lazy.force()),
        TypeSchema::Null => Ok(ValidationSchemaDocument::null()),
        TypeSchema::Void => Ok(ValidationSchemaDocument::never()),
        TypeSchema::Unknown => Ok(ValidationSchemaDocument::any()),
        TypeSchema::Date => Ok(ValidationSchemaDocument::string().with_format("date-time")),
        TypeSchema::Record { .. }
        | TypeSchema::Map { .. }
        | TypeSchema::Set { .. }
        | TypeSchema::Function => Err(SchemaError::unsupported(schema.kind_name(), schema)),
    }
}

/// Converts the top-level schema of a request or response model.
///
/// Models must describe a JSON object.
///
/// # Errors
///
/// Returns [`SchemaError::NonObjectModel`] if the root is not an object
/// schema, or any error [`convert`] returns.
pub fn convert_model(schema: &TypeSchema) -> SchemaResult<ValidationSchemaDocument> {
    match schema {
        TypeSchema::Object { .. } => convert(schema),
        other => Err(SchemaError::NonObjectModel {
            kind: other.kind_name(),
        }),
    }
}

fn convert_literal(schema: &TypeSchema, value: &Value) -> SchemaResult<ValidationSchemaDocument> {
    let schema_type = match value {
        Value::String(_) => SchemaType::String,
        Value::Number(_) => SchemaType::Number,
        Value::Bool(_) => SchemaType::Boolean,
        Value::Null => return Ok(ValidationSchemaDocument::null()),
        Value::Array(_) | Value::Object(_) => {
            return Err(SchemaError::unsupported(schema.kind_name(), schema))
        }
    };
    Ok(ValidationSchemaDocument::of_type(schema_type).with_enum(vec![value.clone()]))
}

/// Native enums carry reverse entries (`"0": "A"`) for numeric members.
/// A key is a forward entry unless looking up its value yields a number.
fn convert_native_enum(values: &IndexMap<String, NativeEnumValue>) -> ValidationSchemaDocument {
    let forward: Vec<&NativeEnumValue> = values
        .iter()
        .filter(|(_, value)| {
            !matches!(
                values.get(&value.as_key()),
                Some(NativeEnumValue::Number(_))
            )
        })
        .map(|(_, value)| value)
        .collect();

    if forward.is_empty() {
        return ValidationSchemaDocument::never();
    }

    let mut kinds: Vec<SchemaType> = Vec::new();
    for value in &forward {
        let kind = match value {
            NativeEnumValue::String(_) => SchemaType::String,
            NativeEnumValue::Number(_) => SchemaType::Number,
        };
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let schema_type = if kinds.len() == 1 {
        SchemaTypes::Single(kinds[0])
    } else {
        SchemaTypes::Union(kinds)
    };

    ValidationSchemaDocument {
        schema_type: Some(schema_type),
        enum_values: forward.iter().map(|value| value.to_value()).collect(),
        ..Default::default()
    }
}

fn convert_object(fields: &IndexMap<String, TypeSchema>) -> SchemaResult<ValidationSchemaDocument> {
    let mut doc = ValidationSchemaDocument::object();
    for (name, field) in fields {
        if !field.is_optional_or_nullable() {
            doc.required.push(name.clone());
        }
        doc.properties
            .insert(name.clone(), convert(field.unwrapped())?);
    }
    Ok(doc)
}
