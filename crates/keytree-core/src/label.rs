//! Display labels and the level-order relabeling pass.
//!
//! Labels are looked up by structural index, never by visit count, so the
//! result depends only on the table and the default label function.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::tree::KeyTree;
use crate::types::NodeIndex;

/// Label given to a node at construction and to any node the table misses.
pub fn default_label(index: NodeIndex) -> String {
    format!("node_{}", index.0)
}

/// Mapping from structural index to display label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable(BTreeMap<u64, String>);

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference labeling for a height-3 tree: the root is `0`, the two
    /// upper internal levels count down from `14`, and the eight leaves
    /// (the end users) are `1` to `8`.
    pub fn diagram() -> Self {
        [
            (0, "0"),
            (1, "13"),
            (2, "14"),
            (3, "9"),
            (4, "10"),
            (5, "11"),
            (6, "12"),
            (7, "1"),
            (8, "2"),
            (9, "3"),
            (10, "4"),
            (11, "5"),
            (12, "6"),
            (13, "7"),
            (14, "8"),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, index: u64, label: impl Into<String>) -> Option<String> {
        self.0.insert(index, label.into())
    }

    pub fn get(&self, index: NodeIndex) -> Option<&str> {
        self.0.get(&index.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl<L: Into<String>> FromIterator<(u64, L)> for LabelTable {
    fn from_iter<I: IntoIterator<Item = (u64, L)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// What a relabeling pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelabelSummary {
    /// Nodes visited and relabeled.
    pub relabeled: usize,
    /// Nodes whose label came from the table.
    pub from_table: usize,
    /// Table entries naming indices that are not in the tree.
    pub unused_entries: Vec<u64>,
}

/// Relabels every node of a tree in a single level-order pass.
pub struct IdentityAssigner<'a> {
    table: &'a LabelTable,
    default_label: fn(NodeIndex) -> String,
}

impl<'a> IdentityAssigner<'a> {
    pub fn new(table: &'a LabelTable) -> Self {
        Self {
            table,
            default_label,
        }
    }

    /// Use a different label for indices the table does not cover.
    pub fn with_default(mut self, default_label: fn(NodeIndex) -> String) -> Self {
        self.default_label = default_label;
        self
    }

    pub fn relabel(&self, tree: &mut KeyTree) -> RelabelSummary {
        relabel(tree, self.table, self.default_label)
    }
}

/// Overwrite every node's identifier with `table[index]` or `default_fn(index)`.
///
/// Visits nodes breadth first, left child before right, starting at the root.
/// Topology, keys and tokens are untouched.
pub fn relabel<F>(tree: &mut KeyTree, table: &LabelTable, default_fn: F) -> RelabelSummary
where
    F: Fn(NodeIndex) -> String,
{
    let mut summary = RelabelSummary::default();

    let mut queue = VecDeque::new();
    if tree.root().is_some() {
        queue.push_back(NodeIndex::ROOT);
    }

    while let Some(index) = queue.pop_front() {
        let label = match table.get(index) {
            Some(label) => {
                summary.from_table += 1;
                label.to_owned()
            }
            None => default_fn(index),
        };

        let Some(node) = tree.node_mut(index) else {
            continue;
        };
        node.identifier = label;
        summary.relabeled += 1;

        queue.extend(node.left);
        queue.extend(node.right);
    }

    let len = tree.len() as u64;
    summary.unused_entries = table.iter().map(|(k, _)| k).filter(|k| *k >= len).collect();

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_table_shape() {
        let table = LabelTable::diagram();

        assert_eq!(table.len(), 15);
        assert_eq!(table.get(NodeIndex::ROOT), Some("0"));
        assert_eq!(table.get(NodeIndex(7)), Some("1"));
        assert_eq!(table.get(NodeIndex(14)), Some("8"));
        assert_eq!(table.get(NodeIndex(15)), None);
    }

    #[test]
    fn test_table_json_uses_string_keys() {
        let table: LabelTable = [(0, "root"), (2, "right")].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"0":"root","2":"right"}"#);

        let parsed: LabelTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_relabel_empty_tree() {
        let mut tree = KeyTree::empty();
        let summary = relabel(&mut tree, &LabelTable::diagram(), default_label);

        assert_eq!(summary.relabeled, 0);
        assert_eq!(summary.unused_entries.len(), 15);
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label(NodeIndex(12)), "node_12");
    }
}
