//! Property tests for dynamic field arrays.
//!
//! - Appending an entry and removing it again restores the roster exactly
//! - Removal never changes the identity or value of surviving entries
//! - Out-of-bounds removal and removal of a kept first entry are no-ops

use formwork_forms::FieldArray;
use proptest::prelude::*;

fn arb_values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{0,6}", 0..8)
}

proptest! {
    #[test]
    fn append_then_remove_restores(values in arb_values(), extra in "[a-z]{0,6}") {
        let mut roster: FieldArray<String> = values.into_iter().collect();
        let before = roster.clone();
        let id = roster.append(extra);
        let index = roster.index_of(id).unwrap();
        prop_assert!(roster.remove(index));
        prop_assert_eq!(roster, before);
    }

    #[test]
    fn removal_preserves_survivors(values in arb_values(), index in 0usize..10) {
        let mut roster: FieldArray<String> = values.into_iter().collect();
        let before: Vec<_> = roster.iter().cloned().collect();
        let removed = roster.remove(index);
        prop_assert_eq!(removed, index < before.len());

        let expected: Vec<_> = before
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !removed || *i != index)
            .map(|(_, e)| e)
            .collect();
        let after: Vec<_> = roster.iter().cloned().collect();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn kept_first_entry_is_never_removed(values in arb_values()) {
        let mut roster = values.into_iter().collect::<FieldArray<String>>().with_keep_first(true);
        let before = roster.clone();
        prop_assert!(!roster.remove(0));
        prop_assert_eq!(roster, before);
    }
}
