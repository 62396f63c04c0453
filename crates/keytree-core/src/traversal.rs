//! Read-only walks over a key tree.
//!
//! Every call starts a fresh walk with its own cursor, so walks can be
//! repeated or interleaved freely.

use std::collections::{HashMap, VecDeque};

use crate::node::Node;
use crate::tree::KeyTree;
use crate::types::NodeIndex;

/// One step of a pre-order walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry<'a> {
    pub index: NodeIndex,
    pub identifier: &'a str,
    pub is_left: Option<bool>,
    pub parent_identifier: Option<&'a str>,
    pub depth: u32,
}

/// Pre-order iterator: node, then left subtree, then right subtree.
pub struct PreOrder<'a> {
    tree: &'a KeyTree,
    stack: Vec<(NodeIndex, u32)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = TraversalEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let node = self.tree.get(index)?;

        // Right first so the left subtree is popped next.
        if let Some(right) = node.right {
            self.stack.push((right, depth + 1));
        }
        if let Some(left) = node.left {
            self.stack.push((left, depth + 1));
        }

        Some(TraversalEntry {
            index,
            identifier: &node.identifier,
            is_left: node.is_left,
            parent_identifier: self.tree.parent_of(node).map(|p| p.identifier.as_str()),
            depth,
        })
    }
}

/// Breadth-first iterator, left child before right.
pub struct LevelOrder<'a> {
    tree: &'a KeyTree,
    queue: VecDeque<NodeIndex>,
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        let node = self.tree.get(index)?;
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some(node)
    }
}

/// A parent-child link by display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent_label: String,
    pub child_label: String,
}

/// Drawing positions for each node, keyed by structural index.
///
/// The root sits at the origin; each level is one unit lower and children
/// are offset horizontally by a spread that halves at every level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: HashMap<NodeIndex, (f64, f64)>,
}

impl Layout {
    pub fn position(&self, index: NodeIndex) -> Option<(f64, f64)> {
        self.positions.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, (f64, f64))> + '_ {
        self.positions.iter().map(|(k, v)| (*k, *v))
    }
}

impl KeyTree {
    pub fn pre_order(&self) -> PreOrder<'_> {
        let stack = if self.is_empty() {
            Vec::new()
        } else {
            vec![(NodeIndex::ROOT, 0)]
        };
        PreOrder { tree: self, stack }
    }

    pub fn level_order(&self) -> LevelOrder<'_> {
        let mut queue = VecDeque::new();
        if !self.is_empty() {
            queue.push_back(NodeIndex::ROOT);
        }
        LevelOrder { tree: self, queue }
    }

    /// All parent-child links in pre-order.
    pub fn edges(&self) -> Vec<Edge> {
        self.pre_order()
            .filter_map(|entry| {
                entry.parent_identifier.map(|parent| Edge {
                    parent_label: parent.to_owned(),
                    child_label: entry.identifier.to_owned(),
                })
            })
            .collect()
    }

    pub fn layout(&self) -> Layout {
        let mut positions = HashMap::with_capacity(self.len());
        let mut stack = Vec::new();
        if !self.is_empty() {
            stack.push((NodeIndex::ROOT, 0.0_f64, 0.0_f64, 1.0_f64));
        }

        while let Some((index, x, y, dx)) = stack.pop() {
            let Some(node) = self.get(index) else {
                continue;
            };
            positions.insert(index, (x, -y));
            if let Some(left) = node.left {
                stack.push((left, x - dx, y + 1.0, dx / 2.0));
            }
            if let Some(right) = node.right {
                stack.push((right, x + dx, y + 1.0, dx / 2.0));
            }
        }

        Layout { positions }
    }
}
