//! Field-level and cross-field validators.
//!
//! A [`Validator`] runs against one coerced field value; a field holds an
//! ordered list of them and the first failure wins. A
//! [`CrossFieldValidator`] runs against a whole coerced object once every
//! field inside it passed, and names the path its error attaches to.

use std::fmt;
use std::sync::{Arc, LazyLock};

use formwork_core::{ErrorKind, FieldError, FormworkError};
use regex::Regex;

use crate::path::FieldPath;
use crate::raw::RawValue;
use crate::value::Value;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

/// A rule evaluated against one coerced field value.
///
/// `root` is the raw object being validated, for rules that need to peek
/// at sibling input.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the given value, returning the failure if invalid.
    fn validate(&self, value: &Value, root: &RawValue) -> Result<(), FieldError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

/// Length of a string in characters, or of a list in elements.
fn measure(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

/// Validates that a string (or list) meets a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    /// The minimum required length.
    pub min_length: usize,
    message: Option<String>,
}

impl MinLengthValidator {
    /// Creates a new `MinLengthValidator` with the given minimum length.
    pub const fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: None,
        }
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value, _root: &RawValue) -> Result<(), FieldError> {
        match measure(value) {
            Some(len) if len < self.min_length => Err(FieldError::new(
                ErrorKind::LengthOutOfRange,
                self.message.clone().unwrap_or_else(|| {
                    format!(
                        "Ensure this value has at least {} characters (it has {len}).",
                        self.min_length
                    )
                }),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinLengthValidator"
    }
}

/// Validates that a string (or list) does not exceed a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    /// The maximum allowed length.
    pub max_length: usize,
    message: Option<String>,
}

impl MaxLengthValidator {
    /// Creates a new `MaxLengthValidator` with the given maximum length.
    pub const fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: None,
        }
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value, _root: &RawValue) -> Result<(), FieldError> {
        match measure(value) {
            Some(len) if len > self.max_length => Err(FieldError::new(
                ErrorKind::LengthOutOfRange,
                self.message.clone().unwrap_or_else(|| {
                    format!(
                        "Ensure this value has at most {} characters (it has {len}).",
                        self.max_length
                    )
                }),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxLengthValidator"
    }
}

/// Validates that a numeric value meets a minimum.
#[derive(Debug, Clone)]
pub struct MinValueValidator {
    /// The minimum required value.
    pub min_value: f64,
    message: Option<String>,
}

impl MinValueValidator {
    /// Creates a new `MinValueValidator` with the given minimum.
    pub const fn new(min_value: f64) -> Self {
        Self {
            min_value,
            message: None,
        }
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: &Value, _root: &RawValue) -> Result<(), FieldError> {
        match value.as_f64() {
            Some(n) if n < self.min_value => Err(FieldError::new(
                ErrorKind::ValueOutOfRange,
                self.message.clone().unwrap_or_else(|| {
                    format!(
                        "Ensure this value is greater than or equal to {}.",
                        self.min_value
                    )
                }),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinValueValidator"
    }
}

/// Validates that a numeric value does not exceed a maximum.
#[derive(Debug, Clone)]
pub struct MaxValueValidator {
    /// The maximum allowed value.
    pub max_value: f64,
    message: Option<String>,
}

impl MaxValueValidator {
    /// Creates a new `MaxValueValidator` with the given maximum.
    pub const fn new(max_value: f64) -> Self {
        Self {
            max_value,
            message: None,
        }
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: &Value, _root: &RawValue) -> Result<(), FieldError> {
        match value.as_f64() {
            Some(n) if n > self.max_value => Err(FieldError::new(
                ErrorKind::ValueOutOfRange,
                self.message.clone().unwrap_or_else(|| {
                    format!(
                        "Ensure this value is less than or equal to {}.",
                        self.max_value
                    )
                }),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxValueValidator"
    }
}

/// Validates that a string looks like an email address.
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    message: Option<String>,
}

impl EmailValidator {
    /// Creates a new `EmailValidator`.
    pub const fn new() -> Self {
        Self { message: None }
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &Value, _root: &RawValue) -> Result<(), FieldError> {
        match value {
            Value::String(s) if !EMAIL_RE.is_match(s) => Err(FieldError::new(
                ErrorKind::FormatInvalid,
                self.message
                    .clone()
                    .unwrap_or_else(|| "Enter a valid email address.".to_string()),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "EmailValidator"
    }
}

/// Validates that a string matches a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: Option<String>,
}

impl RegexValidator {
    /// Compiles `pattern` into a new `RegexValidator`.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::ConfigurationError`] if the pattern is not a
    /// valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, FormworkError> {
        let regex = Regex::new(pattern)
            .map_err(|e| FormworkError::ConfigurationError(format!("Invalid regex: {e}")))?;
        Ok(Self {
            regex,
            message: None,
        })
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value, _root: &RawValue) -> Result<(), FieldError> {
        match value {
            Value::String(s) if !self.regex.is_match(s) => Err(FieldError::new(
                ErrorKind::FormatInvalid,
                self.message
                    .clone()
                    .unwrap_or_else(|| "Enter a valid value.".to_string()),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}

type ValuePredicate = dyn Fn(&Value, &RawValue) -> bool + Send + Sync;

/// A validator backed by a closure: `(value, root) -> passes`.
#[derive(Clone)]
pub struct PredicateValidator {
    name: String,
    error: FieldError,
    predicate: Arc<ValuePredicate>,
}

impl PredicateValidator {
    /// Creates a validator that fails with `kind`/`message` whenever
    /// `predicate` returns `false`.
    pub fn new<F>(name: impl Into<String>, kind: ErrorKind, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, &RawValue) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            error: FieldError::new(kind, message),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for PredicateValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateValidator")
            .field("name", &self.name)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Validator for PredicateValidator {
    fn validate(&self, value: &Value, root: &RawValue) -> Result<(), FieldError> {
        if (self.predicate)(value, root) {
            Ok(())
        } else {
            Err(self.error.clone())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Cross-field ─────────────────────────────────────────────────────────

/// A validation failure addressed to a path relative to the object that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    /// Where the error attaches, relative to the validated object.
    pub path: FieldPath,
    /// The failure.
    pub error: FieldError,
}

/// A rule evaluated against a whole coerced object.
///
/// Every [`PathError`] a rule returns must carry [`target`](Self::target)
/// as its path, so the schema can check the target is declared before any
/// form is mounted.
pub trait CrossFieldValidator: Send + Sync + fmt::Debug {
    /// Returns the error to record, if any.
    fn validate(&self, object: &Value) -> Option<PathError>;

    /// Returns the path, relative to the object, that errors attach to.
    fn target(&self) -> &FieldPath;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

/// Requires `confirm` to equal `field`; the error attaches to `confirm`.
#[derive(Debug, Clone)]
pub struct FieldsMatch {
    field: FieldPath,
    confirm: FieldPath,
    message: Option<String>,
}

impl FieldsMatch {
    /// Creates a rule requiring the sibling field `confirm` to equal the
    /// sibling field `field`.
    pub fn new(field: impl Into<String>, confirm: impl Into<String>) -> Self {
        Self::between(FieldPath::root().key(field), FieldPath::root().key(confirm))
    }

    /// Creates a rule over nested paths, relative to the object.
    pub const fn between(field: FieldPath, confirm: FieldPath) -> Self {
        Self {
            field,
            confirm,
            message: None,
        }
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl CrossFieldValidator for FieldsMatch {
    fn validate(&self, object: &Value) -> Option<PathError> {
        if object.get_path(&self.field) == object.get_path(&self.confirm) {
            return None;
        }
        Some(PathError {
            path: self.confirm.clone(),
            error: FieldError::new(
                ErrorKind::CrossFieldMismatch,
                self.message
                    .clone()
                    .unwrap_or_else(|| format!("Must match {}.", self.field)),
            ),
        })
    }

    fn target(&self) -> &FieldPath {
        &self.confirm
    }

    fn name(&self) -> &str {
        "FieldsMatch"
    }
}

type ObjectPredicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A cross-field rule backed by a closure over the coerced object.
#[derive(Clone)]
pub struct CrossFieldPredicate {
    name: String,
    target: FieldPath,
    error: FieldError,
    predicate: Arc<ObjectPredicate>,
}

impl CrossFieldPredicate {
    /// Creates a rule that attaches `kind`/`message` to `target` whenever
    /// `predicate` returns `false`.
    pub fn new<F>(
        name: impl Into<String>,
        target: FieldPath,
        kind: ErrorKind,
        message: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            target,
            error: FieldError::new(kind, message),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for CrossFieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossFieldPredicate")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl CrossFieldValidator for CrossFieldPredicate {
    fn validate(&self, object: &Value) -> Option<PathError> {
        if (self.predicate)(object) {
            None
        } else {
            Some(PathError {
                path: self.target.clone(),
                error: self.error.clone(),
            })
        }
    }

    fn target(&self) -> &FieldPath {
        &self.target
    }

    fn name(&self) -> &str {
        &self.name
    }
}
