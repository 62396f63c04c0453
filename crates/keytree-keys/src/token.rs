//! Transformation token envelopes.
//!
//! The providers in this crate encode each token as a small CBOR envelope
//! naming the edge it was issued for. The tree itself only ever sees the
//! encoded bytes.

use serde::{Deserialize, Serialize};

use keytree_core::{NodeIndex, TransformationToken};

use crate::error::{KeysError, Result};

/// Current envelope format version.
pub const TOKEN_VERSION: u8 = 1;

/// Decoded form of a transformation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEnvelope {
    /// Envelope format version.
    pub version: u8,

    /// Structural index of the parent end of the edge.
    pub parent: u64,

    /// Structural index of the child end of the edge.
    pub child: u64,

    /// Opaque per-edge material.
    pub material: [u8; 32],
}

impl TokenEnvelope {
    pub fn new(parent: NodeIndex, child: NodeIndex, material: [u8; 32]) -> Self {
        Self {
            version: TOKEN_VERSION,
            parent: parent.get(),
            child: child.get(),
            material,
        }
    }

    pub fn parent(&self) -> NodeIndex {
        NodeIndex(self.parent)
    }

    pub fn child(&self) -> NodeIndex {
        NodeIndex(self.child)
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| KeysError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope: Self =
            ciborium::from_reader(bytes).map_err(|e| KeysError::Decoding(e.to_string()))?;
        if envelope.version != TOKEN_VERSION {
            return Err(KeysError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope)
    }

    /// Decode the envelope carried by a token.
    pub fn decode(token: &TransformationToken) -> Result<Self> {
        Self::from_bytes(token.as_bytes())
    }

    pub fn into_token(self) -> Result<TransformationToken> {
        Ok(TransformationToken::new(self.to_bytes()?))
    }
}
