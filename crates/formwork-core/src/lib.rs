//! # formwork-core
//!
//! Core types shared by every formwork crate: the validation error taxonomy,
//! the framework error type, settings and their loader, and tracing setup.
//! This crate has no formwork dependencies.
//!
//! ## Modules
//!
//! - [`error`] - Validation error kinds, `FieldError`, `FormworkError`
//! - [`settings`] - Host settings
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{ErrorKind, FieldError, FormworkError, FormworkResult};
pub use settings::Settings;
