//! Construction of full key trees.
//!
//! Building runs in two phases: every node first receives its own key pair,
//! then internal nodes are wired to their children and receive one
//! transformation token per edge. Any provider failure aborts the build and
//! drops everything generated so far.

use crate::error::{CoreError, Result};
use crate::label::default_label;
use crate::node::Node;
use crate::provider::KeyProvider;
use crate::topology::{self, MAX_HEIGHT};
use crate::tree::KeyTree;
use crate::types::NodeIndex;

/// Builds key trees from a [`KeyProvider`].
#[derive(Debug, Clone)]
pub struct TreeBuilder<P> {
    provider: P,
}

impl<P: KeyProvider> TreeBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build a full binary tree of the given height.
    ///
    /// A height below 1 yields the empty tree, not an error.
    pub fn build(&self, height: i64) -> Result<KeyTree> {
        build_tree(height, &self.provider)
    }
}

/// Build a full binary tree of `height` using `provider` for all key material.
pub fn build_tree<P: KeyProvider + ?Sized>(height: i64, provider: &P) -> Result<KeyTree> {
    if height < 1 {
        return Ok(KeyTree::empty());
    }
    if height > i64::from(MAX_HEIGHT) {
        return Err(CoreError::HeightTooLarge {
            height,
            max: MAX_HEIGHT,
        });
    }
    let height = height as u32;

    let total = topology::node_count(height);
    let mut nodes = Vec::with_capacity(total as usize);

    for i in 0..total {
        let index = NodeIndex(i);
        let pair = provider
            .generate_key_pair()
            .map_err(|source| CoreError::KeyGeneration { index, source })?;

        nodes.push(Node {
            identifier: default_label(index),
            index,
            encryption_key: pair.encryption_key,
            decryption_key: pair.decryption_key,
            left: None,
            right: None,
            parent: None,
            is_left: None,
            left_re_encryption_key: None,
            right_re_encryption_key: None,
        });
    }

    for i in 0..topology::internal_count(height) {
        let index = NodeIndex(i);
        let left = topology::left_child(index);
        let right = topology::right_child(index);

        let left_token = provider
            .generate_transformation_token(index, left)
            .map_err(|source| CoreError::KeyGeneration { index, source })?;
        let right_token = provider
            .generate_transformation_token(index, right)
            .map_err(|source| CoreError::KeyGeneration { index, source })?;

        let parent = &mut nodes[index.as_usize()];
        parent.left = Some(left);
        parent.right = Some(right);
        parent.left_re_encryption_key = Some(left_token);
        parent.right_re_encryption_key = Some(right_token);

        let child = &mut nodes[left.as_usize()];
        child.parent = Some(index);
        child.is_left = Some(true);

        let child = &mut nodes[right.as_usize()];
        child.parent = Some(index);
        child.is_left = Some(false);
    }

    Ok(KeyTree { nodes, height })
}
