//! The submit state machine.
//!
//! ```text
//! Idle -> Validating -> Submitted -> Idle
//!                    -> Rejected  -> Idle
//! ```
//!
//! A submit snapshots the [`FormState`], validates it against the form's
//! schema and publishes the outcome: a valid submit clears every displayed
//! error, a rejected one replaces them wholesale. The coordinator always
//! comes back to `Idle`; the last terminal phase and the attempt count stay
//! observable.

use std::fmt;

use formwork_core::logging::submit_span;
use formwork_core::{FormworkError, FormworkResult};
use formwork_schema::{validate, ValidationResult};
use serde::Serialize;

use crate::state::FormState;

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPhase {
    /// Waiting for a trigger.
    Idle,
    /// Validating a snapshot.
    Validating,
    /// The last snapshot was valid.
    Submitted,
    /// The last snapshot was invalid.
    Rejected,
}

impl SubmitPhase {
    /// Returns the lowercase name of this phase.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitted => "submitted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives submit attempts for one form.
#[derive(Debug, Clone)]
pub struct SubmitCoordinator {
    form: String,
    phase: SubmitPhase,
    last_outcome: Option<SubmitPhase>,
    attempts: u32,
}

impl SubmitCoordinator {
    /// Creates an idle coordinator for the form called `form`.
    pub fn new(form: impl Into<String>) -> Self {
        Self {
            form: form.into(),
            phase: SubmitPhase::Idle,
            last_outcome: None,
            attempts: 0,
        }
    }

    /// Returns the current phase.
    pub const fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Returns `Submitted` or `Rejected` for the last finished attempt.
    pub const fn last_outcome(&self) -> Option<SubmitPhase> {
        self.last_outcome
    }

    /// Returns how many attempts have been started.
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Starts an attempt: `Idle -> Validating`.
    ///
    /// # Errors
    ///
    /// [`FormworkError::SubmitInProgress`] unless the coordinator is idle.
    pub fn begin(&mut self) -> FormworkResult<u32> {
        if self.phase != SubmitPhase::Idle {
            return Err(FormworkError::SubmitInProgress(self.phase.to_string()));
        }
        self.attempts += 1;
        self.transition(SubmitPhase::Validating);
        Ok(self.attempts)
    }

    /// Finishes the running attempt with `result`, publishing its errors to
    /// `state`, and returns to `Idle`.
    ///
    /// # Errors
    ///
    /// [`FormworkError::SubmitInProgress`] if no attempt is running, or
    /// [`FormworkError::UnknownField`] if `result` carries an error at a
    /// path the form does not declare. The attempt is abandoned and the
    /// coordinator returns to `Idle` either way.
    pub fn finish(&mut self, state: &mut FormState, result: &ValidationResult) -> FormworkResult<SubmitPhase> {
        if self.phase != SubmitPhase::Validating {
            return Err(FormworkError::SubmitInProgress(self.phase.to_string()));
        }
        let outcome = match result {
            ValidationResult::Valid(_) => {
                state.clear_errors();
                tracing::info!(form = %self.form, "submit accepted");
                SubmitPhase::Submitted
            }
            ValidationResult::Invalid(errors) => {
                if let Err(err) = state.replace_errors(errors.clone()) {
                    self.transition(SubmitPhase::Idle);
                    return Err(err);
                }
                tracing::info!(form = %self.form, errors = errors.len(), "submit rejected");
                SubmitPhase::Rejected
            }
        };
        self.transition(outcome);
        self.last_outcome = Some(outcome);
        self.transition(SubmitPhase::Idle);
        Ok(outcome)
    }

    /// Runs one full attempt against `state`.
    ///
    /// # Errors
    ///
    /// [`FormworkError::SubmitInProgress`] unless the coordinator is idle.
    pub fn submit(&mut self, state: &mut FormState) -> FormworkResult<ValidationResult> {
        let attempt = self.begin()?;
        let span = submit_span(&self.form, attempt);
        let _guard = span.enter();

        let snapshot = state.snapshot();
        let result = validate(state.schema(), &snapshot);
        self.finish(state, &result)?;
        Ok(result)
    }

    fn transition(&mut self, next: SubmitPhase) {
        tracing::debug!(form = %self.form, from = %self.phase, to = %next, "submit phase");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use formwork_core::ErrorKind;
    use formwork_schema::prelude::*;

    use super::*;

    fn state() -> FormState {
        let schema = ObjectSchema::new()
            .field("name", FieldSchema::string())
            .field("nickname", FieldSchema::string().required(false));
        FormState::from_schema(Arc::new(schema.into())).unwrap()
    }

    #[test]
    fn test_rejected_then_submitted() {
        let mut state = state();
        let mut coordinator = SubmitCoordinator::new("test");

        let result = coordinator.submit(&mut state).unwrap();
        assert!(!result.is_valid());
        assert_eq!(coordinator.phase(), SubmitPhase::Idle);
        assert_eq!(coordinator.last_outcome(), Some(SubmitPhase::Rejected));
        assert_eq!(
            state.error("name").map(|e| e.kind),
            Some(ErrorKind::RequiredMissing)
        );

        state.set_value("name", "kim").unwrap();
        let result = coordinator.submit(&mut state).unwrap();
        assert!(result.is_valid());
        assert_eq!(coordinator.last_outcome(), Some(SubmitPhase::Submitted));
        assert_eq!(coordinator.attempts(), 2);
        assert!(state.errors().is_empty());
    }

    #[test]
    fn test_rejection_replaces_errors_wholesale() {
        let mut state = state();
        let mut stale = ErrorMap::new();
        stale.insert("nickname".parse().unwrap(), formwork_core::FieldError::of(ErrorKind::FormatInvalid));
        state.replace_errors(stale).unwrap();

        SubmitCoordinator::new("test").submit(&mut state).unwrap();
        assert_eq!(state.errors().paths(), vec!["name"]);
    }

    #[test]
    fn test_trigger_outside_idle_is_refused() {
        let mut state = state();
        let mut coordinator = SubmitCoordinator::new("test");
        coordinator.begin().unwrap();
        assert_eq!(coordinator.phase(), SubmitPhase::Validating);
        assert!(matches!(
            coordinator.submit(&mut state),
            Err(FormworkError::SubmitInProgress(phase)) if phase == "validating"
        ));
        assert_eq!(coordinator.attempts(), 1);

        let result = validate(state.schema(), &state.snapshot());
        assert_eq!(coordinator.finish(&mut state, &result).unwrap(), SubmitPhase::Rejected);
        assert_eq!(coordinator.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn test_finish_with_undeclared_error_path_is_refused() {
        let mut state = state();
        let mut coordinator = SubmitCoordinator::new("test");
        let mut errors = ErrorMap::new();
        errors.insert("surname".parse().unwrap(), formwork_core::FieldError::of(ErrorKind::RequiredMissing));

        coordinator.begin().unwrap();
        assert!(matches!(
            coordinator.finish(&mut state, &ValidationResult::Invalid(errors)),
            Err(FormworkError::UnknownField(p)) if p == "surname"
        ));
        assert_eq!(coordinator.phase(), SubmitPhase::Idle);
        assert_eq!(coordinator.last_outcome(), None);
        assert!(state.errors().is_empty());
    }

    #[test]
    fn test_finish_without_begin_is_refused() {
        let mut state = state();
        let result = ValidationResult::Valid(Value::Null);
        assert!(SubmitCoordinator::new("test").finish(&mut state, &result).is_err());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SubmitPhase::Rejected.to_string(), "rejected");
        assert_eq!(serde_json::to_value(SubmitPhase::Idle).unwrap(), "idle");
    }
}
