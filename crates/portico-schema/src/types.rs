//! Structural type schemas.
//!
//! [`TypeSchema`] is a closed description of the shape of a JSON payload.
//! It is what route definitions use to declare request and response bodies,
//! and what [`convert`](crate::convert) turns into a validation document.
//!
//! Schemas can be built in code with the constructor helpers, or parsed from
//! an internally tagged JSON form:
//!
//! ```
//! use portico_schema::TypeSchema;
//!
//! let parsed: TypeSchema = serde_json::from_str(r#"{
//!     "kind": "object",
//!     "fields": {
//!         "name": { "kind": "string" },
//!         "age": { "kind": "optional", "inner": { "kind": "number" } }
//!     }
//! }"#).unwrap();
//!
//! let built = TypeSchema::object([
//!     ("name", TypeSchema::string()),
//!     ("age", TypeSchema::number().optional()),
//! ]);
//!
//! assert_eq!(parsed, built);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structural type schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeSchema {
    /// Any string.
    String,
    /// Any number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Arbitrary-precision integer, emitted as a 64-bit integer.
    #[serde(rename = "bigint")]
    BigInt,
    /// Exactly one value.
    Literal {
        /// The literal value.
        value: Value,
    },
    /// One of a fixed, ordered set of strings.
    Enum {
        /// Allowed values in declaration order.
        values: Vec<String>,
    },
    /// A name → value mapping in the style of compiled TypeScript enums,
    /// including the reverse entries numeric enums generate.
    NativeEnum {
        /// Entries in declaration order.
        values: IndexMap<String, NativeEnumValue>,
    },
    /// An object with ordered fields. Optional and nullable fields are
    /// expressed by wrapping the field schema.
    Object {
        /// Fields in declaration order.
        #[serde(default)]
        fields: IndexMap<String, TypeSchema>,
    },
    /// A homogeneous list.
    Array {
        /// Element schema.
        element: Box<TypeSchema>,
    },
    /// A fixed-length positional list.
    Tuple {
        /// Element schemas in position order.
        elements: Vec<TypeSchema>,
    },
    /// Any one of several schemas.
    Union {
        /// Variants in declaration order.
        variants: Vec<TypeSchema>,
    },
    /// A union whose variants are told apart by a discriminator field.
    DiscriminatedUnion {
        /// Name of the discriminator field.
        discriminator: String,
        /// Variants in declaration order.
        variants: Vec<TypeSchema>,
    },
    /// Both schemas at once.
    Intersection {
        /// Left operand.
        left: Box<TypeSchema>,
        /// Right operand.
        right: Box<TypeSchema>,
    },
    /// The inner schema, or absent.
    Optional {
        /// Wrapped schema.
        inner: Box<TypeSchema>,
    },
    /// The inner schema, or `null`.
    Nullable {
        /// Wrapped schema.
        inner: Box<TypeSchema>,
    },
    /// A schema produced on demand. Only constructible in code.
    #[serde(skip_deserializing)]
    Lazy(LazySchema),
    /// Exactly `null`.
    Null,
    /// No value at all (undefined, void, never, NaN).
    #[serde(alias = "undefined", alias = "never", alias = "nan")]
    Void,
    /// Anything.
    #[serde(alias = "any")]
    Unknown,
    /// A date-time string.
    Date,
    /// String-keyed dictionary. Not convertible.
    Record {
        /// Value schema.
        value: Box<TypeSchema>,
    },
    /// Arbitrary-keyed map. Not convertible.
    Map {
        /// Key schema.
        key: Box<TypeSchema>,
        /// Value schema.
        value: Box<TypeSchema>,
    },
    /// Unique-element collection. Not convertible.
    Set {
        /// Element schema.
        element: Box<TypeSchema>,
    },
    /// A callable. Not convertible.
    Function,
}

impl TypeSchema {
    /// Creates a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::String
    }

    /// Creates a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::Number
    }

    /// Creates a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean
    }

    /// Creates a literal schema.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Creates a string enum schema.
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a native enum schema from `(name, value)` entries.
    #[must_use]
    pub fn native_enum<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, NativeEnumValue)>,
        K: Into<String>,
    {
        Self::NativeEnum {
            values: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Creates an object schema from `(name, schema)` fields.
    #[must_use]
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeSchema)>,
        K: Into<String>,
    {
        Self::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Creates an array schema.
    #[must_use]
    pub fn array(element: TypeSchema) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Creates a tuple schema.
    #[must_use]
    pub fn tuple(elements: impl IntoIterator<Item = TypeSchema>) -> Self {
        Self::Tuple {
            elements: elements.into_iter().collect(),
        }
    }

    /// Creates a union schema.
    #[must_use]
    pub fn union(variants: impl IntoIterator<Item = TypeSchema>) -> Self {
        Self::Union {
            variants: variants.into_iter().collect(),
        }
    }

    /// Creates a discriminated union schema.
    #[must_use]
    pub fn discriminated_union(
        discriminator: impl Into<String>,
        variants: impl IntoIterator<Item = TypeSchema>,
    ) -> Self {
        Self::DiscriminatedUnion {
            discriminator: discriminator.into(),
            variants: variants.into_iter().collect(),
        }
    }

    /// Creates an intersection schema.
    #[must_use]
    pub fn intersection(left: TypeSchema, right: TypeSchema) -> Self {
        Self::Intersection {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a lazily evaluated schema.
    #[must_use]
    pub fn lazy(thunk: impl Fn() -> TypeSchema + Send + Sync + 'static) -> Self {
        Self::Lazy(LazySchema::new(thunk))
    }

    /// Wraps this schema as optional.
    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional {
            inner: Box::new(self),
        }
    }

    /// Wraps this schema as nullable.
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable {
            inner: Box::new(self),
        }
    }

    /// Returns `true` if this schema is directly wrapped as optional or
    /// nullable. Only the outermost layer is inspected.
    #[must_use]
    pub fn is_optional_or_nullable(&self) -> bool {
        matches!(self, Self::Optional { .. } | Self::Nullable { .. })
    }

    /// Strips every directly nested optional/nullable wrapper.
    #[must_use]
    pub fn unwrapped(&self) -> &TypeSchema {
        let mut current = self;
        while let Self::Optional { inner } | Self::Nullable { inner } = current {
            current = inner.as_ref();
        }
        current
    }

    /// Returns the short kind name of this schema node.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Literal { .. } => "literal",
            Self::Enum { .. } => "enum",
            Self::NativeEnum { .. } => "nativeEnum",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::Tuple { .. } => "tuple",
            Self::Union { .. } => "union",
            Self::DiscriminatedUnion { .. } => "discriminatedUnion",
            Self::Intersection { .. } => "intersection",
            Self::Optional { .. } => "optional",
            Self::Nullable { .. } => "nullable",
            Self::Lazy(_) => "lazy",
            Self::Null => "null",
            Self::Void => "void",
            Self::Unknown => "unknown",
            Self::Date => "date",
            Self::Record { .. } => "record",
            Self::Map { .. } => "map",
            Self::Set { .. } => "set",
            Self::Function => "function",
        }
    }
}

/// A deferred schema.
///
/// The thunk is forced every time the schema is converted. Nothing guards
/// against a thunk that (indirectly) returns itself.
#[derive(Clone)]
pub struct LazySchema(Arc<dyn Fn() -> TypeSchema + Send + Sync>);

impl LazySchema {
    /// Wraps a thunk.
    pub fn new(thunk: impl Fn() -> TypeSchema + Send + Sync + 'static) -> Self {
        Self(Arc::new(thunk))
    }

    /// Evaluates the thunk.
    #[must_use]
    pub fn force(&self) -> TypeSchema {
        (self.0)()
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazySchema(..)")
    }
}

// Identity comparison: two lazy schemas are equal only if they share a thunk.
impl PartialEq for LazySchema {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0).cast::<()>() == Arc::as_ptr(&other.0).cast::<()>()
    }
}

/// A value of a native enum entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeEnumValue {
    /// A string-backed entry.
    String(String),
    /// A number-backed entry.
    Number(serde_json::Number),
}

impl NativeEnumValue {
    /// Returns the property key this value would be looked up under, using
    /// the same rendering as a JavaScript property access (`1.0` → `"1"`).
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    match n.as_f64() {
                        #[allow(clippy::cast_possible_truncation)]
                        Some(f) if f.is_finite() && f.fract() == 0.0 => (f as i64).to_string(),
                        Some(f) => f.to_string(),
                        None => n.to_string(),
                    }
                }
            }
        }
    }

    /// Returns the JSON form of this value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl From<&str> for NativeEnumValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for NativeEnumValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_match_parsed_form() {
        let parsed: TypeSchema = serde_json::from_str(
            r#"{"kind": "array", "element": {"kind": "union", "variants": [
                {"kind": "literal", "value": "admin"},
                {"kind": "literal", "value": "user"}
            ]}}"#,
        )
        .unwrap();

        let built = TypeSchema::array(TypeSchema::union([
            TypeSchema::literal("admin"),
            TypeSchema::literal("user"),
        ]));

        assert_eq!(parsed, built);
    }

    #[test]
    fn test_void_aliases() {
        for kind in ["void", "undefined", "never", "nan"] {
            let parsed: TypeSchema =
                serde_json::from_value(serde_json::json!({ "kind": kind })).unwrap();
            assert_eq!(parsed, TypeSchema::Void, "kind {kind}");
        }
    }

    #[test]
    fn test_lazy_is_not_parseable() {
        let result = serde_json::from_str::<TypeSchema>(r#"{"kind": "lazy"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unwrapped_strips_all_wrappers() {
        let schema = TypeSchema::string().nullable().optional();
        assert!(schema.is_optional_or_nullable());
        assert_eq!(schema.unwrapped(), &TypeSchema::String);
    }

    #[test]
    fn test_lazy_identity_equality() {
        let a = LazySchema::new(TypeSchema::string);
        let b = a.clone();
        let c = LazySchema::new(TypeSchema::string);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.force(), TypeSchema::String);
    }

    #[test]
    fn test_native_enum_value_keys() {
        assert_eq!(NativeEnumValue::from("A").as_key(), "A");
        assert_eq!(NativeEnumValue::from(3).as_key(), "3");

        let float: NativeEnumValue = serde_json::from_str("2.0").unwrap();
        assert_eq!(float.as_key(), "2");

        let frac: NativeEnumValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(frac.as_key(), "2.5");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TypeSchema::BigInt.kind_name(), "bigint");
        assert_eq!(TypeSchema::lazy(TypeSchema::string).kind_name(), "lazy");
        assert_eq!(TypeSchema::Function.kind_name(), "function");
    }
}
