//! The validation pipeline.
//!
//! [`validate`] walks a schema and a raw value together:
//!
//! 1. every leaf is coerced, then its rules run in declaration order; the
//!    first failing rule is recorded and the rest are skipped;
//! 2. objects and array elements are visited recursively, with error paths
//!    prefixed by the parent path and, for arrays, the element's position;
//! 3. array counts are checked against the array's own path;
//! 4. an object's cross-field rules run only when nothing inside that
//!    object failed, against the coerced object.
//!
//! Errors accumulate across siblings, so every problem is reported at once.

use std::collections::BTreeMap;

use formwork_core::{ErrorKind, FieldError};
use serde::Serialize;

use crate::coerce::coerce;
use crate::path::FieldPath;
use crate::raw::RawValue;
use crate::schema::{ArraySchema, FieldSchema, ObjectSchema, Schema};
use crate::value::Value;

static MISSING: RawValue = RawValue::Missing;

/// Errors keyed by field path. At most one error per path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<FieldPath, FieldError>);

impl ErrorMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` at `path` unless that path already has one.
    ///
    /// Returns `true` if the error was recorded.
    pub fn insert(&mut self, path: FieldPath, error: FieldError) -> bool {
        if self.0.contains_key(&path) {
            return false;
        }
        self.0.insert(path, error);
        true
    }

    /// Returns the error at `path`.
    pub fn get(&self, path: &FieldPath) -> Option<&FieldError> {
        self.0.get(path)
    }

    /// Returns the error at a dotted path such as `"companyIndustry.1.value"`.
    pub fn at(&self, path: &str) -> Option<&FieldError> {
        FieldPath::parse(path).ok().and_then(|p| self.0.get(&p))
    }

    /// Returns `true` if a dotted path has an error.
    pub fn contains(&self, path: &str) -> bool {
        self.at(path).is_some()
    }

    /// Removes and returns the error at `path`.
    pub fn remove(&mut self, path: &FieldPath) -> Option<FieldError> {
        self.0.remove(path)
    }

    /// Removes every error at or below `prefix`. Returns how many were removed.
    pub fn remove_under(&mut self, prefix: &FieldPath) -> usize {
        let before = self.0.len();
        self.0.retain(|path, _| !path.starts_with(prefix));
        before - self.0.len()
    }

    /// Removes all errors.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(path, error)` in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldError)> {
        self.0.iter()
    }

    /// Returns the paths with errors, in path order.
    pub fn paths(&self) -> Vec<String> {
        self.0.keys().map(ToString::to_string).collect()
    }

    /// Returns `path -> message`, the form a UI renders.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(p, e)| (p.to_string(), e.message.clone()))
            .collect()
    }

    /// Returns the kind recorded at a dotted path.
    pub fn kind_at(&self, path: &str) -> Option<ErrorKind> {
        self.at(path).map(|e| e.kind)
    }
}

impl<'a> IntoIterator for &'a ErrorMap {
    type Item = (&'a FieldPath, &'a FieldError);
    type IntoIter = std::collections::btree_map::Iter<'a, FieldPath, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The outcome of one validation run.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Every rule passed; carries the coerced value.
    Valid(Value),
    /// At least one rule failed.
    Invalid(ErrorMap),
}

impl ValidationResult {
    /// Returns `true` for [`ValidationResult::Valid`].
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the coerced value, if valid.
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid(_) => None,
        }
    }

    /// Returns the errors, if invalid.
    pub const fn errors(&self) -> Option<&ErrorMap> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<Value, ErrorMap> {
        match self {
            Self::Valid(v) => Ok(v),
            Self::Invalid(e) => Err(e),
        }
    }
}

/// Validates `raw` against `schema`.
///
/// # Examples
///
/// ```
/// use formwork_core::ErrorKind;
/// use formwork_schema::prelude::*;
///
/// let schema: Schema = ObjectSchema::new()
///     .field("name", FieldSchema::string())
///     .field("age", FieldSchema::number().required(false))
///     .into();
///
/// let ok = validate(&schema, &RawValue::object([("name", "kim".into()), ("age", "31".into())]));
/// assert_eq!(ok.value().and_then(|v| v.get("age")), Some(&Value::Float(31.0)));
///
/// let bad = validate(&schema, &RawValue::object([("name", "".into())]));
/// assert_eq!(bad.errors().unwrap().kind_at("name"), Some(ErrorKind::RequiredMissing));
/// ```
pub fn validate(schema: &Schema, raw: &RawValue) -> ValidationResult {
    let mut errors = ErrorMap::new();
    let value = validate_node(schema, raw, raw, &FieldPath::root(), &mut errors);
    if errors.is_empty() {
        tracing::debug!("validation passed");
        ValidationResult::Valid(value)
    } else {
        tracing::debug!(errors = errors.len(), paths = ?errors.paths(), "validation failed");
        ValidationResult::Invalid(errors)
    }
}

fn validate_node(
    schema: &Schema,
    raw: &RawValue,
    root: &RawValue,
    path: &FieldPath,
    errors: &mut ErrorMap,
) -> Value {
    match schema {
        Schema::Field(field) => match validate_field(field, raw, root) {
            Ok(value) => value,
            Err(err) => {
                errors.insert(path.clone(), err);
                Value::Null
            }
        },
        Schema::Object(object) => validate_object(object, raw, root, path, errors),
        Schema::Array(array) => validate_array(array, raw, root, path, errors),
    }
}

/// Coerces one leaf and runs its rules; the first failure wins.
///
/// Rules are skipped for a blank optional value.
pub fn validate_field(field: &FieldSchema, raw: &RawValue, root: &RawValue) -> Result<Value, FieldError> {
    let value = coerce(field, raw)?;
    if field.is_blank(raw) {
        return Ok(value);
    }
    for validator in &field.validators {
        validator.validate(&value, root)?;
    }
    Ok(value)
}

fn validate_object(
    object: &ObjectSchema,
    raw: &RawValue,
    root: &RawValue,
    path: &FieldPath,
    errors: &mut ErrorMap,
) -> Value {
    let children = match raw {
        RawValue::Object(map) => Some(map),
        RawValue::Missing => None,
        RawValue::Text(_) | RawValue::List(_) => {
            errors.insert(
                path.clone(),
                FieldError::new(ErrorKind::TypeCoercionFailed, "Expected an object."),
            );
            return Value::Null;
        }
    };

    let errors_before = errors.len();
    let mut coerced = BTreeMap::new();
    for (name, child) in object.fields() {
        let child_raw = children.and_then(|m| m.get(name)).unwrap_or(&MISSING);
        let value = validate_node(child, child_raw, root, &path.key(name), errors);
        coerced.insert(name.to_string(), value);
    }
    let coerced = Value::Object(coerced);

    if errors.len() == errors_before {
        for rule in object.cross_field_rules() {
            if let Some(failure) = rule.validate(&coerced) {
                tracing::trace!(rule = rule.name(), path = %failure.path, "cross-field rule failed");
                // An undeclared target falls back to the object itself.
                let at = if object.resolve(&failure.path).is_some() {
                    path.join(&failure.path)
                } else {
                    tracing::warn!(rule = rule.name(), target = %failure.path, "undeclared cross-field target");
                    path.clone()
                };
                errors.insert(at, failure.error);
            }
        }
    }

    coerced
}

fn validate_array(
    array: &ArraySchema,
    raw: &RawValue,
    root: &RawValue,
    path: &FieldPath,
    errors: &mut ErrorMap,
) -> Value {
    let items: &[RawValue] = match raw {
        RawValue::List(items) => items,
        RawValue::Missing => &[],
        RawValue::Text(_) | RawValue::Object(_) => {
            errors.insert(
                path.clone(),
                FieldError::new(ErrorKind::TypeCoercionFailed, "Expected a list."),
            );
            return Value::Null;
        }
    };

    // Counts are structural: an empty array visits no element, so the
    // lower bound can only be enforced here.
    if let Err(err) = array.check_count(items.len()) {
        errors.insert(path.clone(), err);
    }

    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_node(array.element(), item, root, &path.index(i), errors))
        .collect();
    Value::List(values)
}
