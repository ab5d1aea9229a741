//! Raw, uncoerced input.
//!
//! Everything a host UI supplies is text (or a selection, which is also
//! text). [`RawValue`] arranges that text into the shape of the schema so
//! that [`validate`](crate::validation::validate) can walk both together.

use std::collections::BTreeMap;

use crate::path::{FieldPath, PathSegment};

/// Raw input for one node of a schema.
///
/// # Examples
///
/// ```
/// use formwork_schema::raw::RawValue;
///
/// let raw = RawValue::object([
///     ("name", RawValue::from("kim")),
///     ("companyIndustry", RawValue::list([RawValue::object([("value", "IT".into())])])),
/// ]);
/// assert_eq!(raw.get("name").and_then(RawValue::as_text), Some("kim"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawValue {
    /// Nothing was supplied.
    #[default]
    Missing,
    /// Text typed or selected by the user.
    Text(String),
    /// Elements of an array field, in roster order.
    List(Vec<RawValue>),
    /// Children of an object, by field name.
    Object(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Builds an object from `(name, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a list from its elements.
    pub fn list<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Returns `true` for [`RawValue::Missing`].
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns the text if this is [`RawValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is [`RawValue::List`].
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a direct child of an object by name.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Follows a field path through objects and lists.
    pub fn get_path(&self, path: &FieldPath) -> Option<&Self> {
        path.segments().iter().try_fold(self, |node, seg| match (node, seg) {
            (Self::Object(map), PathSegment::Key(k)) => map.get(k),
            (Self::List(items), PathSegment::Index(i)) => items.get(*i),
            _ => None,
        })
    }

    /// Converts back to JSON. `Missing` becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Missing => serde_json::Value::Null,
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Self>> for RawValue {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

/// Scalars are rendered as the text an input element would hold.
impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::Bool(b) => Self::Text(b.to_string()),
            serde_json::Value::Number(n) => Self::Text(n.to_string()),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
