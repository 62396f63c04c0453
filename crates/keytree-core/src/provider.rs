//! KeyProvider trait: the source of all key material in a tree.
//!
//! The core never generates keys itself. It asks a provider for one key pair
//! per node and one transformation token per parent-child edge.

use crate::error::KeyGenError;
use crate::types::{KeyPair, NodeIndex, TransformationToken};

/// Source of key pairs and transformation tokens.
///
/// Every call must return fresh material; no two calls may hand out the
/// same key pair or token.
pub trait KeyProvider: Send + Sync {
    /// Generate an independent key pair for one node.
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError>;

    /// Generate the token bridging `parent` to `child`.
    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError>;
}

impl<P: KeyProvider + ?Sized> KeyProvider for &P {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        (**self).generate_key_pair()
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        (**self).generate_transformation_token(parent, child)
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for Box<P> {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        (**self).generate_key_pair()
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        (**self).generate_transformation_token(parent, child)
    }
}
