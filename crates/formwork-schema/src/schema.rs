//! Schema definitions.
//!
//! A schema is a tree of three node kinds:
//!
//! - [`FieldSchema`]: one leaf value with a semantic type and rules;
//! - [`ObjectSchema`]: ordered named children plus cross-field rules;
//! - [`ArraySchema`]: a repeated element with optional count bounds.
//!
//! [`Schema`] is the tagged union of the three. Schemas are built once and
//! never mutated afterwards; share them behind an `Arc`.

use std::collections::HashMap;

use formwork_core::{ErrorKind, FieldError, FormworkError, FormworkResult};

use crate::path::{FieldPath, PathSegment};
use crate::raw::RawValue;
use crate::validators::{CrossFieldValidator, Validator};

/// The semantic type of a leaf field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Free text.
    String,
    /// A floating-point number parsed from text.
    Number,
    /// A whole number parsed from text.
    Integer,
    /// `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`).
    Boolean,
    /// A calendar date in `YYYY-MM-DD` form.
    Date,
    /// One of a closed set of strings.
    Enum {
        /// The allowed values, in display order.
        choices: Vec<String>,
    },
}

impl FieldType {
    /// Builds an [`FieldType::Enum`] from anything string-like.
    pub fn enumeration<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a short name for diagnostics and schema listings.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Enum { .. } => "enum",
        }
    }
}

/// Definition of one leaf value.
///
/// Fields are required by default. A required field whose input is missing
/// or empty fails with [`ErrorKind::RequiredMissing`]. When `trim` is set,
/// surrounding whitespace is removed *before* that check, so whitespace-only
/// input counts as empty.
#[derive(Debug)]
pub struct FieldSchema {
    /// The semantic type, controlling coercion.
    pub field_type: FieldType,
    /// Whether an empty value is an error.
    pub required: bool,
    /// Whether to strip leading/trailing whitespace before anything else.
    pub trim: bool,
    /// Text a fresh form starts with.
    pub initial: Option<String>,
    /// Rules applied in order after coercion.
    pub validators: Vec<Box<dyn Validator>>,
    /// Custom messages for engine-produced errors, keyed by kind.
    pub error_messages: HashMap<ErrorKind, String>,
}

impl FieldSchema {
    /// Creates a required field of the given type with no rules.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            trim: false,
            initial: None,
            validators: Vec::new(),
            error_messages: HashMap::new(),
        }
    }

    /// A required text field.
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// A required number field.
    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// A required integer field.
    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    /// A required boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// A required date field.
    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    /// A required select field over `choices`.
    pub fn enumeration<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FieldType::enumeration(choices))
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether input is trimmed before validation.
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the initial text.
    #[must_use]
    pub fn initial(mut self, text: impl Into<String>) -> Self {
        self.initial = Some(text.into());
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Sets a custom message for engine-produced errors of `kind`.
    #[must_use]
    pub fn error_message(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.error_messages.insert(kind, message.into());
        self
    }

    /// Builds an error of `kind`, preferring this field's custom message
    /// over `fallback`.
    pub fn error(&self, kind: ErrorKind, fallback: impl Into<String>) -> FieldError {
        self.error_messages
            .get(&kind)
            .map_or_else(|| FieldError::new(kind, fallback), |m| FieldError::new(kind, m.clone()))
    }

    /// Returns the input text after the field's trimming policy, or `None`
    /// when nothing (or something non-textual) was supplied.
    pub fn effective_text<'a>(&self, raw: &'a RawValue) -> Option<&'a str> {
        raw.as_text().map(|s| if self.trim { s.trim() } else { s })
    }

    /// Returns `true` if `raw` counts as "no value" for this field.
    pub fn is_blank(&self, raw: &RawValue) -> bool {
        match raw {
            RawValue::Missing => true,
            RawValue::Text(_) => self.effective_text(raw).is_some_and(str::is_empty),
            RawValue::List(_) | RawValue::Object(_) => false,
        }
    }
}

/// Named children plus whole-object rules.
#[derive(Debug, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, Schema)>,
    cross_field: Vec<Box<dyn CrossFieldValidator>>,
}

impl ObjectSchema {
    /// Creates an empty object schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named child. Re-declaring a name replaces the earlier
    /// child in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let name = name.into();
        let schema = schema.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = schema;
        } else {
            self.fields.push((name, schema));
        }
        self
    }

    /// Appends a cross-field rule.
    #[must_use]
    pub fn cross_field(mut self, rule: impl CrossFieldValidator + 'static) -> Self {
        self.cross_field.push(Box::new(rule));
        self
    }

    /// Iterates over children in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Returns the child named `name`.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Returns the cross-field rules in declaration order.
    pub fn cross_field_rules(&self) -> &[Box<dyn CrossFieldValidator>] {
        &self.cross_field
    }

    /// Returns the descendant addressed by `path`, relative to this object.
    ///
    /// The empty path addresses nothing: an object is not its own child.
    pub fn resolve(&self, path: &FieldPath) -> Option<&Schema> {
        let (first, rest) = path.segments().split_first()?;
        let PathSegment::Key(name) = first else {
            return None;
        };
        rest.iter().try_fold(self.get(name)?, |node, seg| node.child(seg))
    }
}

/// A repeated element with optional count bounds.
#[derive(Debug)]
pub struct ArraySchema {
    element: Box<Schema>,
    /// Fewest elements allowed.
    pub min_count: Option<usize>,
    /// Most elements allowed.
    pub max_count: Option<usize>,
    /// When set, the first element can never be removed from a form.
    pub keep_first: bool,
    /// Replaces the default count messages.
    pub count_message: Option<String>,
}

impl ArraySchema {
    /// Creates an unbounded array of `element`.
    pub fn new(element: impl Into<Schema>) -> Self {
        Self {
            element: Box::new(element.into()),
            min_count: None,
            max_count: None,
            keep_first: false,
            count_message: None,
        }
    }

    /// Returns the element schema.
    pub fn element(&self) -> &Schema {
        &self.element
    }

    /// Sets the minimum element count.
    #[must_use]
    pub fn min_count(mut self, min: usize) -> Self {
        self.min_count = Some(min);
        self
    }

    /// Sets the maximum element count.
    #[must_use]
    pub fn max_count(mut self, max: usize) -> Self {
        self.max_count = Some(max);
        self
    }

    /// Forbids removing the first element.
    #[must_use]
    pub fn keep_first(mut self, keep: bool) -> Self {
        self.keep_first = keep;
        self
    }

    /// Replaces the default count messages.
    #[must_use]
    pub fn count_message(mut self, message: impl Into<String>) -> Self {
        self.count_message = Some(message.into());
        self
    }

    /// Checks `len` against the count bounds.
    pub fn check_count(&self, len: usize) -> Result<(), FieldError> {
        let message = |default: String| {
            FieldError::new(
                ErrorKind::LengthOutOfRange,
                self.count_message.clone().unwrap_or(default),
            )
        };
        if let Some(min) = self.min_count {
            if len < min {
                return Err(message(format!(
                    "Ensure this list has at least {min} items (it has {len})."
                )));
            }
        }
        if let Some(max) = self.max_count {
            if len > max {
                return Err(message(format!(
                    "Ensure this list has at most {max} items (it has {len})."
                )));
            }
        }
        Ok(())
    }
}

/// A node of the schema tree.
#[derive(Debug)]
pub enum Schema {
    /// A leaf value.
    Field(FieldSchema),
    /// Named children.
    Object(ObjectSchema),
    /// A repeated element.
    Array(ArraySchema),
}

impl Schema {
    /// Returns a short name of the node kind.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Field(_) => "a field",
            Self::Object(_) => "an object",
            Self::Array(_) => "a list",
        }
    }

    /// Returns the sub-schema addressed by `path`, if the path is declared.
    ///
    /// Any index is accepted for an array, since arrays have no static
    /// length.
    pub fn resolve(&self, path: &FieldPath) -> Option<&Self> {
        path.segments().iter().try_fold(self, |node, seg| node.child(seg))
    }

    /// Returns `true` if `path` addresses a node of this schema.
    pub fn declares(&self, path: &FieldPath) -> bool {
        self.resolve(path).is_some()
    }

    /// Checks that every cross-field rule targets a path its object
    /// declares.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] naming the first undeclared target;
    /// array elements are written as `#`.
    pub fn check_rule_targets(&self) -> FormworkResult<()> {
        self.check_rule_targets_at("")
    }

    fn check_rule_targets_at(&self, at: &str) -> FormworkResult<()> {
        match self {
            Self::Field(_) => Ok(()),
            Self::Array(arr) => arr.element().check_rule_targets_at(&join_label(at, "#")),
            Self::Object(obj) => {
                for rule in obj.cross_field_rules() {
                    if obj.resolve(rule.target()).is_none() {
                        let target = join_label(at, &rule.target().to_string());
                        tracing::warn!(rule = rule.name(), target = %target, "cross-field rule targets an undeclared path");
                        return Err(FormworkError::UnknownField(target));
                    }
                }
                obj.fields()
                    .try_for_each(|(name, child)| child.check_rule_targets_at(&join_label(at, name)))
            }
        }
    }

    fn child(&self, seg: &PathSegment) -> Option<&Self> {
        match (self, seg) {
            (Self::Object(obj), PathSegment::Key(k)) => obj.get(k),
            (Self::Array(arr), PathSegment::Index(_)) => Some(arr.element()),
            _ => None,
        }
    }

    /// Returns the leaf definition if this is a field.
    pub const fn as_field(&self) -> Option<&FieldSchema> {
        match self {
            Self::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the object definition if this is an object.
    pub const fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the array definition if this is an array.
    pub const fn as_array(&self) -> Option<&ArraySchema> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Builds the raw value a freshly mounted form holds for this node.
    ///
    /// Fields start from their `initial` text (or nothing), objects recurse
    /// and arrays start empty.
    pub fn blank(&self) -> RawValue {
        match self {
            Self::Field(f) => f
                .initial
                .as_ref()
                .map_or(RawValue::Missing, |s| RawValue::Text(s.clone())),
            Self::Object(o) => RawValue::Object(
                o.fields()
                    .map(|(name, child)| (name.to_string(), child.blank()))
                    .collect(),
            ),
            Self::Array(_) => RawValue::List(Vec::new()),
        }
    }
}

fn join_label(at: &str, segment: &str) -> String {
    if at.is_empty() {
        segment.to_string()
    } else {
        format!("{at}.{segment}")
    }
}

impl From<FieldSchema> for Schema {
    fn from(f: FieldSchema) -> Self {
        Self::Field(f)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(o: ObjectSchema) -> Self {
        Self::Object(o)
    }
}

impl From<ArraySchema> for Schema {
    fn from(a: ArraySchema) -> Self {
        Self::Array(a)
    }
}

// ── Convenience constructors ────────────────────────────────────────────

/// Defines a required leaf field of `field_type` with `rules` in order.
pub fn define_field(field_type: FieldType, rules: Vec<Box<dyn Validator>>) -> FieldSchema {
    let mut field = FieldSchema::new(field_type);
    field.validators = rules;
    field
}

/// Defines an object from named children and cross-field rules.
pub fn define_object<I, K>(fields: I, rules: Vec<Box<dyn CrossFieldValidator>>) -> ObjectSchema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    let mut object = fields
        .into_iter()
        .fold(ObjectSchema::new(), |obj, (name, schema)| obj.field(name, schema));
    object.cross_field = rules;
    object
}

/// Defines an array of `element` with optional count bounds.
pub fn define_array(
    element: impl Into<Schema>,
    min_count: Option<usize>,
    max_count: Option<usize>,
) -> ArraySchema {
    let mut array = ArraySchema::new(element);
    array.min_count = min_count;
    array.max_count = max_count;
    array
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{FieldsMatch, MinLengthValidator};

    fn industries() -> Schema {
        ObjectSchema::new()
            .field("name", FieldSchema::string().initial(""))
            .field(
                "companyIndustry",
                ArraySchema::new(
                    ObjectSchema::new().field(
                        "value",
                        FieldSchema::string().validator(MinLengthValidator::new(1)),
                    ),
                )
                .max_count(2),
            )
            .into()
    }

    #[test]
    fn test_resolve() {
        let schema = industries();
        let p: FieldPath = "companyIndustry.7.value".parse().unwrap();
        assert!(schema.resolve(&p).and_then(Schema::as_field).is_some());
        let arr: FieldPath = "companyIndustry".parse().unwrap();
        assert!(schema.resolve(&arr).and_then(Schema::as_array).is_some());
        assert!(schema.declares(&FieldPath::root()));
        assert!(!schema.declares(&"companyIndustry.value".parse().unwrap()));
        assert!(!schema.declares(&"nickname".parse().unwrap()));
        assert!(!schema.declares(&"name.first".parse().unwrap()));
    }

    #[test]
    fn test_object_resolve_is_relative() {
        let schema = industries();
        let obj = schema.as_object().unwrap();
        assert!(obj.resolve(&"companyIndustry.0.value".parse().unwrap()).is_some());
        assert!(obj.resolve(&FieldPath::root()).is_none());
        assert!(obj.resolve(&"0".parse().unwrap()).is_none());
    }

    #[test]
    fn test_rule_targets_declared() {
        let ok: Schema = ObjectSchema::new()
            .field("password", FieldSchema::string())
            .field("passwordConfirm", FieldSchema::string())
            .cross_field(FieldsMatch::new("password", "passwordConfirm"))
            .into();
        assert!(ok.check_rule_targets().is_ok());
    }

    #[test]
    fn test_rule_target_typo_is_rejected() {
        let typo: Schema = ObjectSchema::new()
            .field("password", FieldSchema::string())
            .field("passwordConfirm", FieldSchema::string())
            .cross_field(FieldsMatch::new("password", "passwordConfirmation"))
            .into();
        assert!(matches!(
            typo.check_rule_targets(),
            Err(FormworkError::UnknownField(p)) if p == "passwordConfirmation"
        ));
    }

    #[test]
    fn test_rule_target_inside_array_element() {
        let element = ObjectSchema::new()
            .field("pin", FieldSchema::string())
            .cross_field(FieldsMatch::new("pin", "pinConfirm"));
        let schema: Schema = ObjectSchema::new()
            .field("cards", ArraySchema::new(element))
            .into();
        assert!(matches!(
            schema.check_rule_targets(),
            Err(FormworkError::UnknownField(p)) if p == "cards.#.pinConfirm"
        ));
    }

    #[test]
    fn test_blank() {
        let blank = industries().blank();
        assert_eq!(blank.get("name"), Some(&RawValue::from("")));
        assert_eq!(blank.get("companyIndustry"), Some(&RawValue::List(vec![])));
    }

    #[test]
    fn test_field_redeclaration_replaces() {
        let obj = ObjectSchema::new()
            .field("a", FieldSchema::string())
            .field("b", FieldSchema::string())
            .field("a", FieldSchema::number());
        let names: Vec<&str> = obj.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        let a = obj.get("a").and_then(Schema::as_field).unwrap();
        assert_eq!(a.field_type, FieldType::Number);
    }

    #[test]
    fn test_is_blank_respects_trim() {
        let trimmed = FieldSchema::string().trim(true);
        let untrimmed = FieldSchema::string();
        let ws = RawValue::from("   ");
        assert!(trimmed.is_blank(&ws));
        assert!(!untrimmed.is_blank(&ws));
        assert!(untrimmed.is_blank(&RawValue::Missing));
        assert!(!untrimmed.is_blank(&RawValue::List(vec![])));
    }

    #[test]
    fn test_error_prefers_custom_message() {
        let f = FieldSchema::string().error_message(ErrorKind::RequiredMissing, "필수");
        assert_eq!(f.error(ErrorKind::RequiredMissing, "default").message, "필수");
        assert_eq!(f.error(ErrorKind::FormatInvalid, "default").message, "default");
    }

    #[test]
    fn test_check_count() {
        let arr = ArraySchema::new(FieldSchema::string()).min_count(1).max_count(2);
        assert!(arr.check_count(0).is_err());
        assert!(arr.check_count(1).is_ok());
        assert!(arr.check_count(2).is_ok());
        let err = arr.check_count(3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LengthOutOfRange);
        assert!(err.message.contains("at most 2"));
    }

    #[test]
    fn test_define_helpers() {
        let field = define_field(FieldType::String, vec![Box::new(MinLengthValidator::new(6))]);
        assert_eq!(field.validators.len(), 1);
        assert!(field.required);

        let obj = define_object(
            [
                ("password", Schema::from(FieldSchema::string())),
                ("passwordConfirm", Schema::from(FieldSchema::string())),
            ],
            vec![Box::new(FieldsMatch::new("password", "passwordConfirm"))],
        );
        assert_eq!(obj.fields().count(), 2);
        assert_eq!(obj.cross_field_rules().len(), 1);

        let arr = define_array(FieldSchema::string(), None, Some(2));
        assert_eq!(arr.max_count, Some(2));
        assert_eq!(arr.min_count, None);
    }
}
