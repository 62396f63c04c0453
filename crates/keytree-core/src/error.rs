//! Error types for keytree core.

use thiserror::Error;

use crate::types::NodeIndex;

/// Failure reported by a [`KeyProvider`](crate::provider::KeyProvider).
///
/// Providers are external collaborators, so the cause is carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyGenError {
    #[error("key pair generation failed: {0}")]
    KeyPair(String),

    #[error("transformation token generation failed for {parent} -> {child}: {reason}")]
    Token {
        parent: NodeIndex,
        child: NodeIndex,
        reason: String,
    },
}

/// Core errors that can occur while building or checking a key tree.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A key pair or token request failed; no tree was produced.
    #[error("key generation failed at node {index}: {source}")]
    KeyGeneration {
        index: NodeIndex,
        #[source]
        source: KeyGenError,
    },

    #[error("height {height} exceeds the maximum of {max}")]
    HeightTooLarge { height: i64, max: u32 },

    #[error("invariant violated at node {index}: {reason}")]
    InvariantViolation { index: NodeIndex, reason: String },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
