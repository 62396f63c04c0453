//! [`KeyProvider`] implementations.
//!
//! - [`X25519Provider`]: fresh X25519 key pairs and CBOR token envelopes
//!   from the thread RNG.
//! - [`SeededProvider`]: the same construction driven by a seeded RNG, for
//!   reproducible trees.
//! - [`PlaceholderProvider`]: readable stand-in strings
//!   (`enc_key_3`, `re_key_L_1`) for demos and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use keytree_core::{KeyGenError, KeyPair, KeyProvider, NodeIndex, TransformationToken};

use crate::crypto::{derive_token_material, X25519StaticSecret};
use crate::token::TokenEnvelope;

fn x25519_pair<R: RngCore + ?Sized>(rng: &mut R) -> KeyPair {
    let secret = X25519StaticSecret::generate_from(rng);
    let public = secret.public_key();
    KeyPair::new(
        public.to_pem().into_bytes(),
        secret.to_pkcs8_pem().as_bytes().to_vec(),
    )
}

fn envelope_token<R: RngCore + ?Sized>(
    rng: &mut R,
    parent: NodeIndex,
    child: NodeIndex,
) -> Result<TransformationToken, KeyGenError> {
    let mut salt = [0u8; 32];
    rng.fill_bytes(&mut salt);
    let material = derive_token_material(parent, child, &salt);

    TokenEnvelope::new(parent, child, material)
        .into_token()
        .map_err(|e| KeyGenError::Token {
            parent,
            child,
            reason: e.to_string(),
        })
}

/// X25519 key pairs from the thread RNG.
///
/// Encryption keys are X25519 public keys in `PUBLIC KEY` PEM; decryption
/// keys are the matching secrets in PKCS#8 `PRIVATE KEY` PEM.
#[derive(Debug, Clone, Copy, Default)]
pub struct X25519Provider;

impl X25519Provider {
    pub fn new() -> Self {
        Self
    }
}

impl KeyProvider for X25519Provider {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        Ok(x25519_pair(&mut rand::thread_rng()))
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        envelope_token(&mut rand::thread_rng(), parent, child)
    }
}

/// Deterministic X25519 provider.
///
/// Two providers built from the same seed produce identical trees when
/// asked in the same order.
#[derive(Debug)]
pub struct SeededProvider {
    rng: Mutex<StdRng>,
}

impl SeededProvider {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_seed(seed)),
        }
    }

    pub fn from_u64(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, KeyGenError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| KeyGenError::KeyPair(format!("rng mutex poisoned: {}", e)))?;
        Ok(f(&mut *rng))
    }
}

impl KeyProvider for SeededProvider {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        self.with_rng(|rng| x25519_pair(rng))
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        self.with_rng(|rng| envelope_token(rng, parent, child))?
    }
}

/// Human-readable stand-in key material.
///
/// Key pairs are numbered in request order (`enc_key_0`/`dec_key_0`, ...);
/// tokens name the parent and the side of the edge (`re_key_L_0`).
#[derive(Debug, Default)]
pub struct PlaceholderProvider {
    next: AtomicU64,
}

impl PlaceholderProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyProvider for PlaceholderProvider {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(KeyPair::new(
            format!("enc_key_{}", n).into_bytes(),
            format!("dec_key_{}", n).into_bytes(),
        ))
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        let side = match keytree_core::topology::is_left_child(child) {
            Some(true) => 'L',
            Some(false) => 'R',
            None => {
                return Err(KeyGenError::Token {
                    parent,
                    child,
                    reason: "the root is nobody's child".into(),
                })
            }
        };
        Ok(TransformationToken::new(
            format!("re_key_{}_{}", side, parent.get()).into_bytes(),
        ))
    }
}
