//! Index arithmetic for full binary trees stored in level order.
//!
//! Heights count edges: a tree of height `h` has `h + 1` levels, so the
//! smallest non-empty tree (`h = 1`) is a root with two leaves.

use crate::types::NodeIndex;

/// Largest height the builder accepts. 2^25 - 1 nodes is already far more
/// key material than any single export should hold.
pub const MAX_HEIGHT: u32 = 24;

/// Total nodes in a full tree of the given height: `2^(h+1) - 1`.
pub const fn node_count(height: u32) -> u64 {
    (1u64 << (height + 1)) - 1
}

/// Leaves in a full tree of the given height: `2^h`.
pub const fn leaf_count(height: u32) -> u64 {
    1u64 << height
}

/// Internal nodes in a full tree of the given height: `2^h - 1`.
pub const fn internal_count(height: u32) -> u64 {
    (1u64 << height) - 1
}

pub const fn left_child(index: NodeIndex) -> NodeIndex {
    NodeIndex(2 * index.0 + 1)
}

pub const fn right_child(index: NodeIndex) -> NodeIndex {
    NodeIndex(2 * index.0 + 2)
}

/// Parent of a node, or `None` for the root.
pub const fn parent(index: NodeIndex) -> Option<NodeIndex> {
    if index.0 == 0 {
        None
    } else {
        Some(NodeIndex((index.0 - 1) / 2))
    }
}

/// Whether a non-root node is the left child of its parent.
///
/// Left children always sit at odd indices.
pub const fn is_left_child(index: NodeIndex) -> Option<bool> {
    if index.0 == 0 {
        None
    } else {
        Some(index.0 % 2 == 1)
    }
}

/// Depth of a node (root = 0).
pub const fn depth(index: NodeIndex) -> u32 {
    // Level d holds indices 2^d - 1 ..= 2^(d+1) - 2.
    63 - (index.0 + 1).leading_zeros()
}

/// Whether `index` names an internal node in a tree of `height`.
pub const fn is_internal(index: NodeIndex, height: u32) -> bool {
    index.0 < internal_count(height)
}
