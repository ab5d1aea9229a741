//! # formwork
//!
//! Schema-driven form validation with dynamic field arrays.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formwork` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use formwork::forms::{Form, FormDefinition};
//! use formwork::schema::prelude::*;
//!
//! struct Newsletter;
//!
//! impl FormDefinition for Newsletter {
//!     type Output = formwork::serde_json::Value;
//!
//!     fn schema(&self) -> Schema {
//!         ObjectSchema::new()
//!             .field("email", FieldSchema::string().validator(EmailValidator::new()))
//!             .into()
//!     }
//! }
//!
//! let mut form = Form::mount(Newsletter).unwrap();
//! form.set_value("email", "not an address").unwrap();
//! form.handle_submit(|_| {}, |_| {}).unwrap();
//! assert!(form.error("email").is_some());
//! ```

/// Error taxonomy, settings, settings loader and logging.
pub use formwork_core as core;

/// Schemas, coercion and validation.
pub use formwork_schema as schema;

/// Form state, field arrays and the submit lifecycle.
#[cfg(feature = "forms")]
pub use formwork_forms as forms;

/// Command-line host and demo forms.
#[cfg(feature = "cli")]
pub use formwork_cli as cli;

// Third-party re-exports
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// Commonly used types in one import.
pub mod prelude {
    pub use formwork_core::{ErrorKind, FieldError, FormworkError, FormworkResult, Settings};
    pub use formwork_schema::prelude::*;

    #[cfg(feature = "forms")]
    pub use formwork_forms::{EntryId, FieldArray, Form, FormDefinition, FormState, SubmitPhase};
}
