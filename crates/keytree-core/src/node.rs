//! Tree nodes.

use crate::types::{NodeIndex, PublicKeyBlob, SecretKeyBlob, TransformationToken};

/// One identity in the key tree.
///
/// Links are indices into the owning [`KeyTree`](crate::tree::KeyTree), so a
/// parent link never owns anything. Everything except the display label is
/// fixed at construction.
#[derive(Debug)]
pub struct Node {
    pub(crate) identifier: String,
    pub(crate) index: NodeIndex,
    pub(crate) encryption_key: PublicKeyBlob,
    pub(crate) decryption_key: SecretKeyBlob,
    pub(crate) left: Option<NodeIndex>,
    pub(crate) right: Option<NodeIndex>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) is_left: Option<bool>,
    pub(crate) left_re_encryption_key: Option<TransformationToken>,
    pub(crate) right_re_encryption_key: Option<TransformationToken>,
}

impl Node {
    /// Display label.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Structural index (array position).
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn encryption_key(&self) -> &PublicKeyBlob {
        &self.encryption_key
    }

    pub fn decryption_key(&self) -> &SecretKeyBlob {
        &self.decryption_key
    }

    pub fn left(&self) -> Option<NodeIndex> {
        self.left
    }

    pub fn right(&self) -> Option<NodeIndex> {
        self.right
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// `Some(true)` for a left child, `Some(false)` for a right child,
    /// `None` for the root.
    pub fn is_left(&self) -> Option<bool> {
        self.is_left
    }

    pub fn left_re_encryption_key(&self) -> Option<&TransformationToken> {
        self.left_re_encryption_key.as_ref()
    }

    pub fn right_re_encryption_key(&self) -> Option<&TransformationToken> {
        self.right_re_encryption_key.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }
}
