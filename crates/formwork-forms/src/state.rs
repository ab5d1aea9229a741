//! Mutable form state.
//!
//! [`FormState`] holds the raw input of a mounted form in the shape of its
//! schema: text per leaf, named children per object and a
//! [`FieldArray`] roster per array. It also owns the error map shown to
//! the user, which only the submit coordinator replaces wholesale. Edits
//! drop the stale errors they invalidate.

use std::collections::BTreeMap;
use std::sync::Arc;

use formwork_core::{FieldError, FormworkError, FormworkResult};
use formwork_schema::path::PathSegment;
use formwork_schema::{ArraySchema, ErrorMap, FieldPath, RawValue, Schema};

use crate::field_array::{EntryId, FieldArray};

/// One node of the state tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StateNode {
    /// Raw text of a leaf, or nothing.
    Field(RawValue),
    /// Children of an object.
    Object(BTreeMap<String, StateNode>),
    /// Entries of an array.
    Array(FieldArray<StateNode>),
}

impl StateNode {
    /// Builds the node for `schema` from `raw`, rejecting undeclared keys
    /// and structural mismatches.
    fn build(schema: &Schema, raw: &RawValue, path: &FieldPath) -> FormworkResult<Self> {
        match (schema, raw) {
            (Schema::Field(_), RawValue::Missing) => Ok(Self::Field(schema.blank())),
            (Schema::Field(_), RawValue::Text(_)) => Ok(Self::Field(raw.clone())),

            (Schema::Object(object), RawValue::Missing | RawValue::Object(_)) => {
                if let RawValue::Object(map) = raw {
                    if let Some(unknown) = map.keys().find(|k| object.get(k).is_none()) {
                        return Err(FormworkError::UnknownField(path.key(unknown.as_str()).to_string()));
                    }
                }
                let mut children = BTreeMap::new();
                for (name, child) in object.fields() {
                    let child_raw = raw.get(name).unwrap_or(&RawValue::Missing);
                    children.insert(name.to_string(), Self::build(child, child_raw, &path.key(name))?);
                }
                Ok(Self::Object(children))
            }

            (Schema::Array(array), RawValue::Missing | RawValue::List(_)) => {
                let items = raw.as_list().unwrap_or_default();
                let mut roster = FieldArray::new().with_keep_first(array.keep_first);
                for (i, item) in items.iter().enumerate() {
                    roster.append(Self::build(array.element(), item, &path.index(i))?);
                }
                Ok(Self::Array(roster))
            }

            _ => Err(FormworkError::ShapeMismatch {
                path: path.to_string(),
                expected: schema.kind_name(),
            }),
        }
    }

    /// Converts this node back into raw input for validation.
    pub fn to_raw(&self) -> RawValue {
        match self {
            Self::Field(raw) => raw.clone(),
            Self::Object(children) => RawValue::Object(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_raw()))
                    .collect(),
            ),
            Self::Array(roster) => RawValue::List(roster.values().map(Self::to_raw).collect()),
        }
    }

    fn locate(&self, path: &FieldPath) -> Option<&Self> {
        path.segments().iter().try_fold(self, |node, seg| match (node, seg) {
            (Self::Object(children), PathSegment::Key(k)) => children.get(k),
            (Self::Array(roster), PathSegment::Index(i)) => roster.get(*i),
            _ => None,
        })
    }

    fn locate_mut(&mut self, path: &FieldPath) -> Option<&mut Self> {
        let mut node = self;
        for seg in path.segments() {
            node = match (node, seg) {
                (Self::Object(children), PathSegment::Key(k)) => children.get_mut(k)?,
                (Self::Array(roster), PathSegment::Index(i)) => roster.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

/// The raw values and displayed errors of one mounted form.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use formwork_forms::state::FormState;
/// use formwork_schema::prelude::*;
///
/// let schema = Arc::new(Schema::from(
///     ObjectSchema::new()
///         .field("name", FieldSchema::string())
///         .field("tags", ArraySchema::new(FieldSchema::string())),
/// ));
/// let mut state = FormState::from_schema(schema).unwrap();
/// state.set_value("name", "kim").unwrap();
/// let id = state.append("tags", "rust".into()).unwrap();
/// assert_eq!(state.element_path("tags", id).unwrap().unwrap().to_string(), "tags.0");
/// ```
#[derive(Debug, Clone)]
pub struct FormState {
    schema: Arc<Schema>,
    root: StateNode,
    errors: ErrorMap,
}

impl FormState {
    /// Builds state for `schema` seeded from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::UnknownField`] if `defaults` names a field
    /// the schema does not declare or a cross-field rule targets one, or
    /// [`FormworkError::ShapeMismatch`] if a default has the wrong
    /// structure.
    pub fn new(schema: Arc<Schema>, defaults: &RawValue) -> FormworkResult<Self> {
        schema.check_rule_targets()?;
        let root = StateNode::build(&schema, defaults, &FieldPath::root())?;
        Ok(Self {
            schema,
            root,
            errors: ErrorMap::new(),
        })
    }

    /// Builds state for `schema` with no defaults.
    ///
    /// # Errors
    ///
    /// See [`FormState::new`].
    pub fn from_schema(schema: Arc<Schema>) -> FormworkResult<Self> {
        Self::new(schema, &RawValue::Missing)
    }

    /// Returns the schema this state is shaped by.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns a shared handle to the schema.
    pub fn schema_handle(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Replaces the text of the leaf at `path`.
    ///
    /// Drops the stale error recorded at `path`, if any; no re-validation
    /// happens until the next submit.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if the path is not declared or
    /// names an array entry that does not exist;
    /// [`FormworkError::ShapeMismatch`] if it addresses an object or array.
    pub fn set_value(&mut self, path: &str, text: impl Into<String>) -> FormworkResult<()> {
        let path = self.declared(path)?;
        if self.schema.resolve(&path).and_then(Schema::as_field).is_none() {
            return Err(FormworkError::ShapeMismatch {
                path: path.to_string(),
                expected: "a field",
            });
        }
        let node = self
            .root
            .locate_mut(&path)
            .ok_or_else(|| FormworkError::UnknownField(path.to_string()))?;
        *node = StateNode::Field(RawValue::Text(text.into()));
        if self.errors.remove(&path).is_some() {
            tracing::debug!(%path, "dropped stale error after edit");
        }
        tracing::trace!(%path, "value set");
        Ok(())
    }

    /// Returns the raw input at `path`, or `None` if nothing is there.
    pub fn value(&self, path: &str) -> Option<RawValue> {
        let path = FieldPath::parse(path).ok()?;
        self.root.locate(&path).map(StateNode::to_raw)
    }

    /// Appends an element built from `raw` to the array at `path`.
    ///
    /// Errors recorded under the array are dropped, since positions of the
    /// remaining messages would no longer line up. The array's `max_count`
    /// is enforced at submit time, not here.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if `path` is not an array in this
    /// form, or `raw` names undeclared fields;
    /// [`FormworkError::ShapeMismatch`] if `raw` does not fit the element.
    pub fn append(&mut self, path: &str, raw: RawValue) -> FormworkResult<EntryId> {
        let path = self.declared(path)?;
        let (array, roster) = self.array_mut(&path)?;
        let element = StateNode::build(array.element(), &raw, &path.index(roster.len()))?;
        let id = roster.append(element);
        let dropped = self.errors.remove_under(&path);
        tracing::debug!(%path, %id, dropped, "array element appended");
        Ok(id)
    }

    /// Appends a blank element (initial values only) to the array at `path`.
    ///
    /// # Errors
    ///
    /// See [`FormState::append`].
    pub fn append_default(&mut self, path: &str) -> FormworkResult<EntryId> {
        self.append(path, RawValue::Missing)
    }

    /// Removes the element at `index` from the array at `path`.
    ///
    /// Returns `false` without touching anything when `index` is out of
    /// bounds or protects the first element.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if `path` is not an array.
    pub fn remove(&mut self, path: &str, index: usize) -> FormworkResult<bool> {
        let path = self.declared(path)?;
        let (_, roster) = self.array_mut(&path)?;
        if !roster.remove(index) {
            return Ok(false);
        }
        let dropped = self.errors.remove_under(&path);
        tracing::debug!(%path, index, dropped, "array element removed");
        Ok(true)
    }

    /// Returns the current position of entry `id` in the array at `path`.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if `path` is not an array.
    pub fn index_of(&self, path: &str, id: EntryId) -> FormworkResult<Option<usize>> {
        Ok(self.roster(path)?.index_of(id))
    }

    /// Returns the identities of the array at `path`, in order.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if `path` is not an array.
    pub fn ids(&self, path: &str) -> FormworkResult<Vec<EntryId>> {
        Ok(self.roster(path)?.ids())
    }

    /// Returns the current field path of entry `id`, e.g. `companyIndustry.1`.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if `path` is not an array.
    pub fn element_path(&self, path: &str, id: EntryId) -> FormworkResult<Option<FieldPath>> {
        let array_path = FieldPath::parse(path)?;
        Ok(self.roster(path)?.index_of(id).map(|i| array_path.index(i)))
    }

    /// Returns the whole form as raw input.
    pub fn snapshot(&self) -> RawValue {
        self.root.to_raw()
    }

    /// Returns the errors currently displayed.
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Returns the error displayed at `path`.
    pub fn error(&self, path: &str) -> Option<&FieldError> {
        self.errors.at(path)
    }

    /// Replaces the displayed errors.
    ///
    /// # Errors
    ///
    /// [`FormworkError::UnknownField`] if any path is not declared by the
    /// schema; the displayed errors are left untouched.
    pub fn replace_errors(&mut self, errors: ErrorMap) -> FormworkResult<()> {
        if let Some(path) = errors.iter().map(|(p, _)| p).find(|p| !self.schema.declares(p)) {
            return Err(FormworkError::UnknownField(path.to_string()));
        }
        self.errors = errors;
        Ok(())
    }

    /// Clears the displayed errors.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn declared(&self, path: &str) -> FormworkResult<FieldPath> {
        let parsed = FieldPath::parse(path)?;
        if !self.schema.declares(&parsed) {
            return Err(FormworkError::UnknownField(path.to_string()));
        }
        Ok(parsed)
    }

    fn roster(&self, path: &str) -> FormworkResult<&FieldArray<StateNode>> {
        let parsed = self.declared(path)?;
        match self.root.locate(&parsed) {
            Some(StateNode::Array(roster)) => Ok(roster),
            Some(_) => Err(FormworkError::ShapeMismatch {
                path: parsed.to_string(),
                expected: "a list",
            }),
            None => Err(FormworkError::UnknownField(parsed.to_string())),
        }
    }

    fn array_mut(&mut self, path: &FieldPath) -> FormworkResult<(&ArraySchema, &mut FieldArray<StateNode>)> {
        let array = self.schema.resolve(path).and_then(Schema::as_array).ok_or_else(|| {
            FormworkError::ShapeMismatch {
                path: path.to_string(),
                expected: "a list",
            }
        })?;
        match self.root.locate_mut(path) {
            Some(StateNode::Array(roster)) => Ok((array, roster)),
            _ => Err(FormworkError::UnknownField(path.to_string())),
        }
    }
}
