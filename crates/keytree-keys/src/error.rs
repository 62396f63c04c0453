//! Error types for the keys module.

use thiserror::Error;

/// Errors that can occur while encoding or inspecting key material.
#[derive(Debug, Error)]
pub enum KeysError {
    /// Token envelope could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Token envelope could not be decoded.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Envelope carries a version this crate does not understand.
    #[error("unsupported token version: {0}")]
    UnsupportedVersion(u8),
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeysError>;
