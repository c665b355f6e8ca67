//! # Portico Schema
//!
//! Structural type schemas and their conversion to validation-schema
//! documents (the JSON Schema draft 4 subset API gateways validate against).
//!
//! ## Example
//!
//! ```
//! use portico_schema::{convert_model, TypeSchema};
//!
//! let schema = TypeSchema::object([
//!     ("name", TypeSchema::string()),
//!     ("email", TypeSchema::string().optional()),
//! ]);
//!
//! let doc = convert_model(&schema).unwrap();
//! assert_eq!(doc.required, vec!["name".to_string()]);
//! ```

#![doc(html_root_url = "https://docs.rs/portico-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod convert;
mod document;
mod error;
mod types;

pub use convert::{convert, convert_model};
pub use document::{
    SchemaItems, SchemaType, SchemaTypes, ValidationSchemaDocument, JSON_SCHEMA_DRAFT4,
};
pub use error::{SchemaError, SchemaResult};
pub use types::{LazySchema, NativeEnumValue, TypeSchema};
