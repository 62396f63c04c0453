//! The key tree: a flat arena of nodes in level order.
//!
//! Array position equals structural index, so parent and child lookups are
//! plain index arithmetic and the structure has no reference cycles.

use std::collections::HashSet;

use crate::error::{CoreError, Result};
use crate::node::Node;
use crate::topology;
use crate::types::NodeIndex;

/// A full binary tree of key-bearing nodes, possibly empty.
#[derive(Debug, Default)]
pub struct KeyTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) height: u32,
}

impl KeyTree {
    /// The empty tree (what a height below 1 builds).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.as_usize())
    }

    /// All nodes in structural (level) order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height in edges; 0 for the empty tree.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn left_of(&self, node: &Node) -> Option<&Node> {
        node.left.and_then(|i| self.get(i))
    }

    pub fn right_of(&self, node: &Node) -> Option<&Node> {
        node.right.and_then(|i| self.get(i))
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent.and_then(|i| self.get(i))
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn internal_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_internal())
    }

    /// Find the first node carrying a display label.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.identifier == identifier)
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.as_usize())
    }

    /// Verify every structural invariant of a full key tree.
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Ok(());
        }

        let expected = topology::node_count(self.height);
        if self.nodes.len() as u64 != expected {
            return Err(violation(
                NodeIndex::ROOT,
                format!("expected {} nodes, found {}", expected, self.nodes.len()),
            ));
        }

        let mut public_keys = HashSet::new();
        let mut secret_keys = HashSet::new();

        for (slot, node) in self.nodes.iter().enumerate() {
            let index = node.index;
            if index.as_usize() != slot {
                return Err(violation(index, format!("stored at slot {}", slot)));
            }

            if node.parent != topology::parent(index) {
                return Err(violation(index, "parent link does not match index"));
            }
            if node.is_left != topology::is_left_child(index) {
                return Err(violation(index, "is_left does not match position"));
            }

            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    if left != topology::left_child(index) || right != topology::right_child(index)
                    {
                        return Err(violation(index, "child links do not match index"));
                    }
                    let (Some(l), Some(r)) = (self.get(left), self.get(right)) else {
                        return Err(violation(index, "child outside the arena"));
                    };
                    if l.parent != Some(index) || l.is_left != Some(true) {
                        return Err(violation(left, "left child does not point back"));
                    }
                    if r.parent != Some(index) || r.is_left != Some(false) {
                        return Err(violation(right, "right child does not point back"));
                    }
                    if node.left_re_encryption_key.is_none()
                        || node.right_re_encryption_key.is_none()
                    {
                        return Err(violation(index, "internal node missing a token"));
                    }
                    if !topology::is_internal(index, self.height) {
                        return Err(violation(index, "children below the leaf level"));
                    }
                }
                (None, None) => {
                    if node.left_re_encryption_key.is_some()
                        || node.right_re_encryption_key.is_some()
                    {
                        return Err(violation(index, "leaf carries a token"));
                    }
                    if topology::is_internal(index, self.height) {
                        return Err(violation(index, "internal position without children"));
                    }
                }
                _ => return Err(violation(index, "node has exactly one child")),
            }

            if !public_keys.insert(node.encryption_key.as_bytes()) {
                return Err(violation(index, "encryption key shared with another node"));
            }
            if !secret_keys.insert(node.decryption_key.expose()) {
                return Err(violation(index, "decryption key shared with another node"));
            }
        }

        Ok(())
    }
}

fn violation(index: NodeIndex, reason: impl Into<String>) -> CoreError {
    CoreError::InvariantViolation {
        index,
        reason: reason.into(),
    }
}
