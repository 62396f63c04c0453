//! Golden vectors for labeling and record naming.
//!
//! These pin down the observable results of relabeling a tree and of
//! turning display labels into storage names.

use keytree_core::LabelTable;

/// Expected labels of the height-3 diagram tree, in level order.
pub const DIAGRAM_LEVEL_ORDER: [&str; 15] = [
    "0", "13", "14", "9", "10", "11", "12", "1", "2", "3", "4", "5", "6", "7", "8",
];

/// Expected pre-order walk of the height-3 diagram tree.
pub const DIAGRAM_PRE_ORDER: [&str; 15] = [
    "0", "13", "9", "1", "2", "10", "3", "4", "14", "11", "5", "6", "12", "7", "8",
];

/// A display label and the storage name it must produce.
#[derive(Debug, Clone, Copy)]
pub struct NameVector {
    pub label: &'static str,
    pub sanitized: &'static str,
}

/// Sanitization vectors.
pub fn name_vectors() -> Vec<NameVector> {
    vec![
        NameVector {
            label: "1 (U1)",
            sanitized: "1_U1",
        },
        NameVector {
            label: "13 (ALL)",
            sanitized: "13_ALL",
        },
        NameVector {
            label: "0",
            sanitized: "0",
        },
        NameVector {
            label: "node_7",
            sanitized: "node_7",
        },
        NameVector {
            label: "a b",
            sanitized: "a_b",
        },
        NameVector {
            label: "a/b",
            sanitized: "a_b",
        },
        NameVector {
            label: "v1.2-rc",
            sanitized: "v1.2-rc",
        },
        NameVector {
            label: "()",
            sanitized: "",
        },
        NameVector {
            label: "ü",
            sanitized: "_",
        },
    ]
}

/// A height-3 table in the annotated style: each label carries the user
/// group it stands for, e.g. `"9 (U1,U2)"`.
pub fn annotated_table() -> LabelTable {
    [
        (0, "0"),
        (1, "13 (U1-U4)"),
        (2, "14 (U5-U8)"),
        (3, "9 (U1,U2)"),
        (4, "10 (U3,U4)"),
        (5, "11 (U5,U6)"),
        (6, "12 (U7,U8)"),
        (7, "1 (U1)"),
        (8, "2 (U2)"),
        (9, "3 (U3)"),
        (10, "4 (U4)"),
        (11, "5 (U5)"),
        (12, "6 (U6)"),
        (13, "7 (U7)"),
        (14, "8 (U8)"),
    ]
    .into_iter()
    .collect()
}

/// Storage names the annotated table must produce, in level order.
pub const ANNOTATED_NAMES: [&str; 15] = [
    "0",
    "13_U1-U4",
    "14_U5-U8",
    "9_U1_U2",
    "10_U3_U4",
    "11_U5_U6",
    "12_U7_U8",
    "1_U1",
    "2_U2",
    "3_U3",
    "4_U4",
    "5_U5",
    "6_U6",
    "7_U7",
    "8_U8",
];

#[cfg(test)]
mod tests {
    use super::*;
    use keytree_core::{build_tree, default_label, relabel};
    use keytree_keys::PlaceholderProvider;
    use keytree_store::sanitize_identifier;

    #[test]
    fn test_name_vectors() {
        for v in name_vectors() {
            assert_eq!(sanitize_identifier(v.label), v.sanitized, "label {:?}", v.label);
        }
    }

    #[test]
    fn test_diagram_vectors() {
        let mut tree = build_tree(3, &PlaceholderProvider::new()).unwrap();
        relabel(&mut tree, &LabelTable::diagram(), default_label);

        let level: Vec<&str> = tree.level_order().map(|n| n.identifier()).collect();
        let pre: Vec<&str> = tree.pre_order().map(|e| e.identifier).collect();

        assert_eq!(level, DIAGRAM_LEVEL_ORDER);
        assert_eq!(pre, DIAGRAM_PRE_ORDER);
    }

    #[test]
    fn test_annotated_vectors() {
        let table = annotated_table();
        let names: Vec<String> = (0..15u64)
            .map(|i| sanitize_identifier(table.get(keytree_core::NodeIndex(i)).unwrap_or("")))
            .collect();

        assert_eq!(names, ANNOTATED_NAMES);
    }
}
