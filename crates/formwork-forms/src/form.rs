//! The form facade.
//!
//! A [`FormDefinition`] declares what a form is: its schema, its default
//! values and the typed object a valid submit produces. [`Form`] mounts a
//! definition and is what a host UI talks to: it routes edits into the
//! [`FormState`], runs submits through the [`SubmitCoordinator`] and hands
//! the outcome to the caller's callbacks.

use std::sync::Arc;

use formwork_core::{FieldError, FormworkResult};
use formwork_schema::{ErrorMap, RawValue, Schema, ValidationResult};
use serde::de::DeserializeOwned;

use crate::field_array::EntryId;
use crate::state::FormState;
use crate::submit::{SubmitCoordinator, SubmitPhase};

/// Declares a form.
///
/// # Examples
///
/// ```
/// use formwork_forms::form::{Form, FormDefinition};
/// use formwork_schema::prelude::*;
///
/// #[derive(serde::Deserialize)]
/// struct Contact {
///     email: String,
/// }
///
/// struct ContactForm;
///
/// impl FormDefinition for ContactForm {
///     type Output = Contact;
///
///     fn schema(&self) -> Schema {
///         ObjectSchema::new()
///             .field("email", FieldSchema::string().validator(EmailValidator::new()))
///             .into()
///     }
/// }
///
/// let mut form = Form::mount(ContactForm).unwrap();
/// form.set_value("email", "kim@example.com").unwrap();
/// let mut sent = None;
/// form.handle_submit(|c: Contact| sent = Some(c.email), |_| {}).unwrap();
/// assert_eq!(sent.as_deref(), Some("kim@example.com"));
/// ```
pub trait FormDefinition {
    /// The object a valid submit is deserialized into.
    type Output: DeserializeOwned;

    /// Returns the schema of this form.
    fn schema(&self) -> Schema;

    /// Returns the values a freshly mounted form starts with.
    fn defaults(&self) -> RawValue {
        RawValue::Missing
    }

    /// Returns the name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A mounted form.
pub struct Form<D: FormDefinition> {
    definition: D,
    defaults: RawValue,
    schema: Arc<Schema>,
    state: FormState,
    coordinator: SubmitCoordinator,
}

impl<D: FormDefinition> Form<D> {
    /// Mounts `definition` with its own defaults.
    ///
    /// # Errors
    ///
    /// Fails if the defaults do not fit the schema; see [`FormState::new`].
    pub fn mount(definition: D) -> FormworkResult<Self> {
        let defaults = definition.defaults();
        Self::mount_with(definition, &defaults)
    }

    /// Mounts `definition` with caller-supplied defaults, which
    /// [`reset`](Self::reset) restores from then on.
    ///
    /// # Errors
    ///
    /// Fails if `defaults` do not fit the schema; see [`FormState::new`].
    pub fn mount_with(definition: D, defaults: &RawValue) -> FormworkResult<Self> {
        let schema = Arc::new(definition.schema());
        let state = FormState::new(Arc::clone(&schema), defaults)?;
        let coordinator = SubmitCoordinator::new(definition.name());
        tracing::debug!(form = definition.name(), "form mounted");
        Ok(Self {
            definition,
            defaults: defaults.clone(),
            schema,
            state,
            coordinator,
        })
    }

    /// Returns the definition this form was mounted from.
    pub const fn definition(&self) -> &D {
        &self.definition
    }

    /// Returns the current state.
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Returns the submit coordinator.
    pub const fn coordinator(&self) -> &SubmitCoordinator {
        &self.coordinator
    }

    /// Sets the text of the leaf at `path`.
    ///
    /// # Errors
    ///
    /// See [`FormState::set_value`].
    pub fn set_value(&mut self, path: &str, text: impl Into<String>) -> FormworkResult<()> {
        self.state.set_value(path, text)
    }

    /// Returns the raw input at `path`.
    pub fn value(&self, path: &str) -> Option<RawValue> {
        self.state.value(path)
    }

    /// Appends a blank element to the array at `path`.
    ///
    /// # Errors
    ///
    /// See [`FormState::append`].
    pub fn append(&mut self, path: &str) -> FormworkResult<EntryId> {
        self.state.append_default(path)
    }

    /// Appends an element built from `raw` to the array at `path`.
    ///
    /// # Errors
    ///
    /// See [`FormState::append`].
    pub fn append_with(&mut self, path: &str, raw: RawValue) -> FormworkResult<EntryId> {
        self.state.append(path, raw)
    }

    /// Removes the element at `index` of the array at `path`.
    ///
    /// # Errors
    ///
    /// See [`FormState::remove`].
    pub fn remove(&mut self, path: &str, index: usize) -> FormworkResult<bool> {
        self.state.remove(path, index)
    }

    /// Returns the errors currently displayed.
    pub const fn errors(&self) -> &ErrorMap {
        self.state.errors()
    }

    /// Returns the error displayed at `path`.
    pub fn error(&self, path: &str) -> Option<&FieldError> {
        self.state.error(path)
    }

    /// Submits the form.
    ///
    /// On success the coerced value is deserialized into
    /// [`FormDefinition::Output`] and passed to `on_valid`; otherwise
    /// `on_invalid` receives the error map, which is also kept for display.
    /// Returns the terminal phase of this attempt.
    ///
    /// # Errors
    ///
    /// [`FormworkError::SubmitInProgress`](formwork_core::FormworkError::SubmitInProgress)
    /// if a submit is already running, or
    /// [`FormworkError::SerializationError`](formwork_core::FormworkError::SerializationError)
    /// if the valid value does not fit `Output`.
    pub fn handle_submit<V, I>(&mut self, on_valid: V, on_invalid: I) -> FormworkResult<SubmitPhase>
    where
        V: FnOnce(D::Output),
        I: FnOnce(&ErrorMap),
    {
        match self.coordinator.submit(&mut self.state)? {
            ValidationResult::Valid(value) => {
                let output: D::Output = value.deserialize()?;
                on_valid(output);
                Ok(SubmitPhase::Submitted)
            }
            ValidationResult::Invalid(errors) => {
                on_invalid(&errors);
                Ok(SubmitPhase::Rejected)
            }
        }
    }

    /// Restores the defaults the form was mounted with and clears every
    /// error.
    ///
    /// Array entries receive fresh identities.
    ///
    /// # Errors
    ///
    /// Fails if the defaults do not fit the schema.
    pub fn reset(&mut self) -> FormworkResult<()> {
        self.state = FormState::new(Arc::clone(&self.schema), &self.defaults)?;
        tracing::debug!(form = self.definition.name(), "form reset");
        Ok(())
    }
}
