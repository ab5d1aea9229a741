//! Dynamic field arrays: an ordered roster of entries with stable identity.
//!
//! A [`FieldArray`] backs every array node of a form. Each entry receives
//! an [`EntryId`] when it is appended and keeps it for its whole lifetime,
//! so a host UI can key rendered rows by identity rather than position.
//! Removing an entry shifts the positions of the entries after it but
//! never their identities or values.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The stable identity of one roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a [`FieldArray`].
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry<T> {
    /// The identity assigned at append time.
    pub id: EntryId,
    /// The entry's current value.
    pub value: T,
}

/// An ordered, identity-tracked list of entries.
///
/// # Examples
///
/// ```
/// use formwork_forms::field_array::FieldArray;
///
/// let mut roster = FieldArray::new();
/// let first = roster.append("IT");
/// let second = roster.append("Bio");
/// assert!(roster.remove(0));
/// assert_eq!(roster.index_of(second), Some(0));
/// assert_eq!(roster.index_of(first), None);
///
/// // Out of bounds is a no-op.
/// assert!(!roster.remove(5));
/// assert_eq!(roster.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray<T> {
    entries: Vec<RosterEntry<T>>,
    keep_first: bool,
}

impl<T> Default for FieldArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldArray<T> {
    /// Creates an empty roster.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            keep_first: false,
        }
    }

    /// When `keep`, removing the entry at index 0 is refused.
    #[must_use]
    pub fn with_keep_first(mut self, keep: bool) -> Self {
        self.keep_first = keep;
        self
    }

    /// Returns `true` if the first entry is protected from removal.
    pub const fn keeps_first(&self) -> bool {
        self.keep_first
    }

    /// Appends `value` at the end and returns its new identity.
    pub fn append(&mut self, value: T) -> EntryId {
        let id = EntryId::generate();
        self.entries.push(RosterEntry { id, value });
        tracing::debug!(%id, len = self.entries.len(), "roster entry appended");
        id
    }

    /// Removes the entry at `index`.
    ///
    /// Returns `false` and leaves the roster untouched when `index` is out
    /// of bounds, or when it is 0 and the first entry is protected.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            tracing::warn!(index, len = self.entries.len(), "ignoring removal past the end of the roster");
            return false;
        }
        if index == 0 && self.keep_first {
            tracing::debug!("first roster entry is kept");
            return false;
        }
        let removed = self.entries.remove(index);
        tracing::debug!(id = %removed.id, index, "roster entry removed");
        true
    }

    /// Returns the current position of the entry with `id`.
    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Returns the value at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.value)
    }

    /// Returns the value at `index` for in-place editing.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(|e| &mut e.value)
    }

    /// Returns the identities in roster order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the roster has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in roster order.
    pub fn iter(&self) -> std::slice::Iter<'_, RosterEntry<T>> {
        self.entries.iter()
    }

    /// Iterates over the values in roster order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }
}

impl<T> FromIterator<T> for FieldArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut roster = Self::new();
        for value in iter {
            roster.append(value);
        }
        roster
    }
}

impl<'a, T> IntoIterator for &'a FieldArray<T> {
    type Item = &'a RosterEntry<T>;
    type IntoIter = std::slice::Iter<'a, RosterEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_distinct_ids() {
        let mut roster = FieldArray::new();
        let a = roster.append(1);
        let b = roster.append(2);
        assert_ne!(a, b);
        assert_eq!(roster.ids(), vec![a, b]);
        assert_eq!(roster.get(1), Some(&2));
    }

    #[test]
    fn test_remove_preserves_other_identities() {
        let mut roster: FieldArray<&str> = ["a", "b", "c"].into_iter().collect();
        let ids = roster.ids();
        assert!(roster.remove(1));
        assert_eq!(roster.ids(), vec![ids[0], ids[2]]);
        assert_eq!(roster.values().copied().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(roster.index_of(ids[2]), Some(1));
        assert_eq!(roster.index_of(ids[1]), None);
    }

    #[test]
    fn test_remove_out_of_bounds_is_noop() {
        let mut roster: FieldArray<i32> = [1, 2].into_iter().collect();
        let before = roster.clone();
        assert!(!roster.remove(2));
        assert!(!roster.remove(usize::MAX));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_keep_first() {
        let mut roster: FieldArray<i32> = [1, 2].into_iter().collect::<FieldArray<_>>().with_keep_first(true);
        let before = roster.clone();
        assert!(!roster.remove(0));
        assert_eq!(roster, before);
        assert!(roster.remove(1));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut roster = FieldArray::new();
        let id = roster.append(String::from("x"));
        roster.get_mut(0).unwrap().push('y');
        assert_eq!(roster.get(0).map(String::as_str), Some("xy"));
        assert_eq!(roster.index_of(id), Some(0));
    }

    #[test]
    fn test_entry_id_serializes_as_uuid_string() {
        let id = EntryId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
