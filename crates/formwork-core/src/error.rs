//! Core error types for formwork.
//!
//! Two families of failure live here and they are deliberately kept apart:
//!
//! - [`FieldError`] / [`ErrorKind`] describe a *validation* failure. They are
//!   data: produced by the schema engine, collected into an error map and
//!   rendered next to the offending field. None of them is fatal.
//! - [`FormworkError`] describes a misuse of the API or an environment
//!   failure (unknown field path, malformed configuration file, ...). These
//!   are returned through `Result` and propagated with `?`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The class of a validation failure.
///
/// Every [`FieldError`] carries exactly one kind. The kind decides the
/// default message and the stable [`code`](ErrorKind::code) used to look up
/// custom messages on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required value is absent or empty (after trimming, if enabled).
    RequiredMissing,
    /// Raw text could not be converted into the field's semantic type.
    TypeCoercionFailed,
    /// The value does not have the expected shape (email, pattern, ...).
    FormatInvalid,
    /// A string or array is shorter or longer than allowed.
    LengthOutOfRange,
    /// A number is below or above the allowed bounds.
    ValueOutOfRange,
    /// A select value is not one of the declared choices.
    ValueNotInEnumeration,
    /// A cross-field rule failed (e.g. confirmation does not match).
    CrossFieldMismatch,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::RequiredMissing,
        Self::TypeCoercionFailed,
        Self::FormatInvalid,
        Self::LengthOutOfRange,
        Self::ValueOutOfRange,
        Self::ValueNotInEnumeration,
        Self::CrossFieldMismatch,
    ];

    /// Returns the short, stable code for this kind.
    pub const fn code(self) -> &'static str {
        match self {
            Self::RequiredMissing => "required",
            Self::TypeCoercionFailed => "invalid_type",
            Self::FormatInvalid => "invalid_format",
            Self::LengthOutOfRange => "length",
            Self::ValueOutOfRange => "range",
            Self::ValueNotInEnumeration => "invalid_choice",
            Self::CrossFieldMismatch => "mismatch",
        }
    }

    /// Looks a kind up by its [`code`](ErrorKind::code).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Returns the message used when neither the rule nor the field
    /// supplies one.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::RequiredMissing => "This field is required.",
            Self::TypeCoercionFailed => "Enter a value of the expected type.",
            Self::FormatInvalid => "Enter a valid value.",
            Self::LengthOutOfRange => "Ensure this value has a valid length.",
            Self::ValueOutOfRange => "Ensure this value is within the allowed range.",
            Self::ValueNotInEnumeration => "Select a valid choice.",
            Self::CrossFieldMismatch => "The values do not match.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation failure attached to one field path.
///
/// # Examples
///
/// ```
/// use formwork_core::error::{ErrorKind, FieldError};
///
/// let err = FieldError::new(ErrorKind::RequiredMissing, "name is required");
/// assert_eq!(err.kind, ErrorKind::RequiredMissing);
/// assert_eq!(err.to_string(), "name is required");
///
/// let err = FieldError::of(ErrorKind::ValueNotInEnumeration);
/// assert_eq!(err.message, "Select a valid choice.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The class of failure.
    pub kind: ErrorKind,
    /// The user-facing message.
    pub message: String,
}

impl FieldError {
    /// Creates a new `FieldError` with an explicit message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a `FieldError` carrying the kind's default message.
    pub fn of(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    /// Returns the stable code of this error's kind.
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

/// The primary error type for formwork.
///
/// Validation failures are *not* represented here; see [`FieldError`].
#[derive(Error, Debug)]
pub enum FormworkError {
    // ── Binding ──────────────────────────────────────────────────────

    /// A field path does not address anything declared in the schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A value was supplied whose structure does not match the schema
    /// (e.g. a list where a text field is declared).
    #[error("Shape mismatch at '{path}': expected {expected}")]
    ShapeMismatch {
        /// The offending path.
        path: String,
        /// What the schema declares at that path.
        expected: &'static str,
    },

    // ── Submission ───────────────────────────────────────────────────

    /// A submit was triggered while the coordinator was not idle.
    #[error("Submit already in progress (phase: {0})")]
    SubmitInProgress(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormworkError {
    /// Returns the process exit code a command-line host should use.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownField(_) | Self::ShapeMismatch { .. } => 64,
            Self::SubmitInProgress(_) => 75,
            Self::ConfigurationError(_) => 78,
            Self::SerializationError(_) => 65,
            Self::IoError(_) => 74,
        }
    }
}

impl From<serde_json::Error> for FormworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormworkError>`.
pub type FormworkResult<T> = Result<T, FormworkError>;
