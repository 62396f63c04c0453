//! Strong type definitions for keytree.
//!
//! Structural indices and key material are newtypes so that display labels,
//! public keys and secrets cannot be mixed up at compile time.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Position of a node in the array serialization of a full binary tree.
///
/// The root is 0; the children of `i` are `2i+1` and `2i+2`. This is the
/// only key used for topology, independent of the node's display label.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub u64);

impl NodeIndex {
    /// The root index.
    pub const ROOT: Self = Self(0);

    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Array slot for this index.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for NodeIndex {
    fn from(index: u64) -> Self {
        Self(index)
    }
}

/// Opaque public (encryption) key material.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKeyBlob(Bytes);

impl PublicKeyBlob {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for PublicKeyBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "PublicKey({})", &hex[..hex.len().min(16)])
    }
}

impl AsRef<[u8]> for PublicKeyBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Opaque private (decryption) key material.
///
/// Deliberately not `Clone`: a secret lives in exactly one node. The bytes
/// are wiped when the owning node is dropped.
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKeyBlob(Vec<u8>);

impl SecretKeyBlob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the raw secret bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKeyBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<{} bytes redacted>)", self.0.len())
    }
}

/// A freshly generated asymmetric key pair.
#[derive(Debug)]
pub struct KeyPair {
    pub encryption_key: PublicKeyBlob,
    pub decryption_key: SecretKeyBlob,
}

impl KeyPair {
    pub fn new(encryption_key: impl Into<Bytes>, decryption_key: Vec<u8>) -> Self {
        Self {
            encryption_key: PublicKeyBlob::new(encryption_key),
            decryption_key: SecretKeyBlob::new(decryption_key),
        }
    }
}

/// Opaque token bridging a parent to one of its children.
///
/// The core stores it as data; interpreting it is the job of whatever
/// re-encryption scheme produced it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TransformationToken(Bytes);

impl TransformationToken {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for TransformationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Token({})", &hex[..hex.len().min(16)])
    }
}

impl AsRef<[u8]> for TransformationToken {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
