//! Field paths.
//!
//! A [`FieldPath`] addresses one value inside a (possibly nested) schema.
//! Its text form joins segments with dots; array positions are plain
//! numbers: `companyIndustry.1.value`. The empty string is the root.

use std::fmt;
use std::str::FromStr;

use formwork_core::FormworkError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// An object field name.
    Key(String),
    /// A positional array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A dotted/indexed address of a value.
///
/// # Examples
///
/// ```
/// use formwork_schema::path::FieldPath;
///
/// let path = FieldPath::root().key("companyIndustry").index(1).key("value");
/// assert_eq!(path.to_string(), "companyIndustry.1.value");
///
/// let parsed: FieldPath = "companyIndustry.1.value".parse().unwrap();
/// assert_eq!(parsed, path);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, addressing the root value.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns this path extended by an object key.
    #[must_use]
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut segs = self.0.clone();
        segs.push(PathSegment::Key(name.into()));
        Self(segs)
    }

    /// Returns this path extended by an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segs = self.0.clone();
        segs.push(PathSegment::Index(index));
        Self(segs)
    }

    /// Returns `self` followed by every segment of `other`.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut segs = self.0.clone();
        segs.extend(other.0.iter().cloned());
        Self(segs)
    }

    /// Returns the path without its last segment, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Returns the last segment.
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Returns `true` if `prefix` is a (non-strict) prefix of this path.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Parses a dotted path. Purely numeric segments become indices.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::UnknownField`] for empty segments such as
    /// `"a..b"` or a trailing dot.
    pub fn parse(text: &str) -> Result<Self, FormworkError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        text.split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(FormworkError::UnknownField(text.to_string()))
                } else if seg.bytes().all(|b| b.is_ascii_digit()) {
                    seg.parse::<usize>()
                        .map(PathSegment::Index)
                        .map_err(|_| FormworkError::UnknownField(text.to_string()))
                } else {
                    Ok(PathSegment::Key(seg.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = FormworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segs: Vec<PathSegment>) -> Self {
        Self(segs)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let p: FieldPath = "representatives.0.name".parse().unwrap();
        assert_eq!(
            p.segments(),
            &[
                PathSegment::Key("representatives".into()),
                PathSegment::Index(0),
                PathSegment::Key("name".into()),
            ]
        );
        assert_eq!(p.to_string(), "representatives.0.name");
    }

    #[test]
    fn test_root() {
        let p: FieldPath = "".parse().unwrap();
        assert!(p.is_root());
        assert_eq!(p.to_string(), "");
        assert_eq!(p.parent(), None);
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a.").is_err());
        assert!(FieldPath::parse(".a").is_err());
    }

    #[test]
    fn test_parent_and_prefix() {
        let p = FieldPath::root().key("companyIndustry").index(1).key("value");
        let parent = p.parent().unwrap();
        assert_eq!(parent.to_string(), "companyIndustry.1");
        let array = FieldPath::root().key("companyIndustry");
        assert!(p.starts_with(&array));
        assert!(array.starts_with(&array));
        assert!(!array.starts_with(&p));
        assert!(!FieldPath::root().key("company").starts_with(&array));
    }

    #[test]
    fn test_join() {
        let base = FieldPath::root().key("address");
        let rel: FieldPath = "zip".parse().unwrap();
        assert_eq!(base.join(&rel).to_string(), "address.zip");
        assert_eq!(base.join(&FieldPath::root()), base);
    }

    #[test]
    fn test_ordering_groups_children_after_parent() {
        let mut paths: Vec<FieldPath> = ["name", "companyIndustry.1.value", "companyIndustry"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["companyIndustry", "companyIndustry.1.value", "name"]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let p: FieldPath = "a.2.b".parse().unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"a.2.b\"");
        let back: FieldPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
