//! Coercion of raw text into a field's semantic type.
//!
//! Coercion always happens before any rule runs, in this order:
//!
//! 1. trim (if the field declares it);
//! 2. required check on the trimmed text;
//! 3. type conversion (number parsing, enumeration membership, ...).
//!
//! A conversion failure is a [`FieldError`], never a panic.

use formwork_core::{ErrorKind, FieldError};

use crate::raw::RawValue;
use crate::schema::{FieldSchema, FieldType};
use crate::value::Value;

/// Coerces `raw` into the type `field` declares.
///
/// Blank input (missing, or empty after trimming) yields
/// [`ErrorKind::RequiredMissing`] for required fields. For optional fields
/// it yields the empty value of the type: `""` for strings and `Null`
/// otherwise. An enumeration that explicitly lists `""` as a choice accepts
/// blank input even when required.
///
/// # Examples
///
/// ```
/// use formwork_core::ErrorKind;
/// use formwork_schema::coerce::coerce;
/// use formwork_schema::raw::RawValue;
/// use formwork_schema::schema::FieldSchema;
/// use formwork_schema::value::Value;
///
/// let age = FieldSchema::number();
/// assert_eq!(coerce(&age, &RawValue::from("31")), Ok(Value::Float(31.0)));
/// let err = coerce(&age, &RawValue::from("thirty")).unwrap_err();
/// assert_eq!(err.kind, ErrorKind::TypeCoercionFailed);
/// ```
pub fn coerce(field: &FieldSchema, raw: &RawValue) -> Result<Value, FieldError> {
    if matches!(raw, RawValue::List(_) | RawValue::Object(_)) {
        return Err(field.error(
            ErrorKind::TypeCoercionFailed,
            format!("Expected a single {} value.", field.field_type.type_name()),
        ));
    }

    let text = field.effective_text(raw).unwrap_or("");
    if text.is_empty() {
        return blank_value(field);
    }

    match &field.field_type {
        FieldType::String => Ok(Value::String(text.to_string())),

        FieldType::Number => match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Float(n)),
            _ => Err(field.error(ErrorKind::TypeCoercionFailed, "Enter a number.")),
        },

        FieldType::Integer => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| field.error(ErrorKind::TypeCoercionFailed, "Enter a whole number.")),

        FieldType::Boolean => match text.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(field.error(ErrorKind::TypeCoercionFailed, "Enter true or false.")),
        },

        FieldType::Date => chrono::NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| {
                field.error(
                    ErrorKind::TypeCoercionFailed,
                    "Enter a valid date (YYYY-MM-DD).",
                )
            }),

        FieldType::Enum { choices } => {
            if choices.iter().any(|c| c == text) {
                Ok(Value::String(text.to_string()))
            } else {
                Err(field.error(
                    ErrorKind::ValueNotInEnumeration,
                    format!("Select a valid choice. {text} is not one of the available choices."),
                ))
            }
        }
    }
}

fn blank_value(field: &FieldSchema) -> Result<Value, FieldError> {
    if let FieldType::Enum { choices } = &field.field_type {
        if choices.iter().any(String::is_empty) {
            return Ok(Value::String(String::new()));
        }
    }
    if field.required {
        return Err(field.error(
            ErrorKind::RequiredMissing,
            ErrorKind::RequiredMissing.default_message(),
        ));
    }
    Ok(match field.field_type {
        FieldType::String => Value::String(String::new()),
        _ => Value::Null,
    })
}
