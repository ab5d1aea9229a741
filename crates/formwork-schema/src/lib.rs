//! # formwork-schema
//!
//! Declarative schemas for form values and the engine that validates raw
//! input against them. A schema is a tree of fields, objects and arrays;
//! [`validate`](validation::validate) turns raw text into typed values or
//! a path-keyed map of errors.
//!
//! ## Modules
//!
//! - [`schema`] - Field, object and array definitions
//! - [`validators`] - Built-in field rules and cross-field rules
//! - [`coerce`] - Raw text to typed value conversion
//! - [`validation`] - The validation pipeline, `ErrorMap`, `ValidationResult`
//! - [`path`] - Dotted/indexed field paths
//! - [`raw`] - Raw, uncoerced input
//! - [`value`] - Coerced values

pub mod coerce;
pub mod path;
pub mod raw;
pub mod schema;
pub mod validation;
pub mod validators;
pub mod value;

pub use path::{FieldPath, PathSegment};
pub use raw::RawValue;
pub use schema::{ArraySchema, FieldSchema, FieldType, ObjectSchema, Schema};
pub use validation::{validate, ErrorMap, ValidationResult};
pub use value::Value;

/// The types needed to declare and validate a schema.
pub mod prelude {
    pub use crate::path::FieldPath;
    pub use crate::raw::RawValue;
    pub use crate::schema::{
        define_array, define_field, define_object, ArraySchema, FieldSchema, FieldType,
        ObjectSchema, Schema,
    };
    pub use crate::validation::{validate, ErrorMap, ValidationResult};
    pub use crate::validators::{
        CrossFieldPredicate, CrossFieldValidator, EmailValidator, FieldsMatch, MaxLengthValidator,
        MaxValueValidator, MinLengthValidator, MinValueValidator, PredicateValidator,
        RegexValidator, Validator,
    };
    pub use crate::value::Value;
}
