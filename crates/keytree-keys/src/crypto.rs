//! Cryptographic utilities for key providers.
//!
//! Provides X25519 key pairs and Blake3 derivation of token material.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use keytree_core::NodeIndex;

/// Blake3 context for transformation token material.
pub const TOKEN_DOMAIN: &str = "keytree-v0-transform";

/// An X25519 public key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

/// An X25519 static secret key.
pub struct X25519StaticSecret(StaticSecret);

impl X25519StaticSecret {
    /// Generate a new random secret from the thread RNG.
    pub fn generate() -> Self {
        Self::generate_from(&mut rand::thread_rng())
    }

    /// Generate a new secret from the given RNG.
    pub fn generate_from<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let secret = Self(StaticSecret::from(bytes));
        bytes.zeroize();
        secret
    }

    /// Create from seed bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Derive the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Raw secret bytes. The caller owns the copy.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

/// Derive 32 bytes of token material for the edge `parent -> child`.
///
/// The random salt makes every call unique even for the same edge.
pub fn derive_token_material(parent: NodeIndex, child: NodeIndex, salt: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(TOKEN_DOMAIN);
    hasher.update(&parent.get().to_be_bytes());
    hasher.update(&child.get().to_be_bytes());
    hasher.update(salt);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_public_key_matches_secret() {
        let secret = X25519StaticSecret::generate();
        let restored = X25519StaticSecret::from_bytes(secret.to_bytes());

        assert_eq!(secret.public_key(), restored.public_key());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = X25519StaticSecret::generate_from(&mut StdRng::seed_from_u64(7));
        let b = X25519StaticSecret::generate_from(&mut StdRng::seed_from_u64(7));

        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_token_material_deterministic() {
        let salt = [0x42; 32];
        let m1 = derive_token_material(NodeIndex(0), NodeIndex(1), &salt);
        let m2 = derive_token_material(NodeIndex(0), NodeIndex(1), &salt);

        assert_eq!(m1, m2);
    }

    #[test]
    fn test_token_material_binds_edge() {
        let salt = [0x42; 32];
        let left = derive_token_material(NodeIndex(0), NodeIndex(1), &salt);
        let right = derive_token_material(NodeIndex(0), NodeIndex(2), &salt);

        assert_ne!(left, right);
    }
}
