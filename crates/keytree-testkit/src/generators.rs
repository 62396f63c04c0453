//! Proptest generators for property-based testing.

use proptest::prelude::*;

use keytree_core::{topology, LabelTable};

/// Heights that build a non-empty tree small enough for fast tests.
pub fn height() -> impl Strategy<Value = i64> {
    1i64..=6
}

/// Heights that build nothing.
pub fn empty_height() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), Just(-1i64), i64::MIN..0]
}

/// A raw display label, possibly containing characters that sanitize away.
pub fn raw_label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ()._/-]{0,12}"
}

/// A label that survives sanitization unchanged.
pub fn clean_label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,12}"
}

/// A label table with up to `max_index / 2` entries for indices below
/// `max_index`.
pub fn label_table(max_index: u64) -> impl Strategy<Value = LabelTable> {
    prop::collection::btree_map(0..max_index, raw_label(), 0..=(max_index / 2) as usize)
        .prop_map(|map| map.into_iter().collect())
}

/// A height together with a label table that gives every node of that
/// tree a distinct, storage-safe label.
pub fn height_with_unique_labels() -> impl Strategy<Value = (i64, LabelTable)> {
    height().prop_flat_map(|h| {
        let count = topology::node_count(h as u32) as usize;
        (
            Just(h),
            prop::collection::hash_set(clean_label(), count).prop_map(|labels| {
                labels
                    .into_iter()
                    .enumerate()
                    .map(|(i, label)| (i as u64, label))
                    .collect::<LabelTable>()
            }),
        )
    })
}
