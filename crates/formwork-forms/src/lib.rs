//! # formwork-forms
//!
//! Binds a [`formwork_schema`] schema to mutable form state. Provides the
//! identity-tracked [`FieldArray`](field_array::FieldArray) roster behind
//! every array field, the [`FormState`](state::FormState) tree with its
//! displayed errors, the submit state machine and the [`Form`](form::Form)
//! facade a host UI drives.
//!
//! ## Modules
//!
//! - [`field_array`] - Dynamic arrays with stable entry identity
//! - [`state`] - Raw values and displayed errors of a mounted form
//! - [`submit`] - The `Idle -> Validating -> Submitted | Rejected` cycle
//! - [`form`] - `FormDefinition` and `Form`

pub mod field_array;
pub mod form;
pub mod state;
pub mod submit;

pub use field_array::{EntryId, FieldArray};
pub use form::{Form, FormDefinition};
pub use state::FormState;
pub use submit::{SubmitCoordinator, SubmitPhase};
