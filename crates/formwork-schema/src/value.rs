//! Coerced, typed values.
//!
//! The [`Value`] enum is what the schema engine produces after coercion and
//! what rules inspect. A successful validation yields a `Value::Object`
//! which can be turned into JSON or deserialized into a user type.

use std::collections::BTreeMap;
use std::fmt;

use formwork_core::FormworkError;
use serde::de::DeserializeOwned;

use crate::path::{FieldPath, PathSegment};

/// A coerced form value.
///
/// # Examples
///
/// ```
/// use formwork_schema::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v.as_str(), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (an optional field left empty).
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A date without time.
    Date(chrono::NaiveDate),
    /// The elements of an array field, in roster order.
    List(Vec<Value>),
    /// The fields of an object, keyed by name.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value of an `Int` or `Float`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the fields if this is a [`Value::Object`].
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a direct child of an object by name.
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// Follows a field path through objects and lists.
    pub fn get_path(&self, path: &FieldPath) -> Option<&Self> {
        path.segments().iter().try_fold(self, |node, seg| match (node, seg) {
            (Self::Object(map), PathSegment::Key(k)) => map.get(k),
            (Self::List(items), PathSegment::Index(i)) => items.get(*i),
            _ => None,
        })
    }

    /// Converts this value to plain JSON.
    ///
    /// Dates become `"YYYY-MM-DD"` strings; non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Deserializes this value into a user type via its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::SerializationError`] if the shape does not
    /// fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, FormworkError> {
        serde_json::from_value(self.to_json()).map_err(FormworkError::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::List(_) | Self::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        let mut inner = BTreeMap::new();
        inner.insert("value".to_string(), Value::from("IT"));
        let mut root = BTreeMap::new();
        root.insert("name".to_string(), Value::from("kim"));
        root.insert(
            "companyIndustry".to_string(),
            Value::List(vec![Value::Object(inner)]),
        );
        Value::Object(root)
    }

    #[test]
    fn test_get_path() {
        let v = sample();
        let path: FieldPath = "companyIndustry.0.value".parse().unwrap();
        assert_eq!(v.get_path(&path), Some(&Value::from("IT")));
        let missing: FieldPath = "companyIndustry.3.value".parse().unwrap();
        assert_eq!(v.get_path(&missing), None);
        assert_eq!(v.get_path(&FieldPath::root()), Some(&v));
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(
            json,
            serde_json::json!({"name": "kim", "companyIndustry": [{"value": "IT"}]})
        );
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::Date(date).to_json(), serde_json::json!("2024-02-29"));
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Industry {
            value: String,
        }
        #[derive(serde::Deserialize, Debug, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            name: String,
            company_industry: Vec<Industry>,
        }
        let data: Data = sample().deserialize().unwrap();
        assert_eq!(data.name, "kim");
        assert_eq!(data.company_industry[0].value, "IT");
    }

    #[test]
    fn test_deserialize_shape_error() {
        let result = Value::from("x").deserialize::<Vec<String>>();
        assert!(matches!(result, Err(FormworkError::SerializationError(_))));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("3").as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(Some(5_i64)).to_string(), "5");
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
