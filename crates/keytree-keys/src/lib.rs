//! # keytree Keys
//!
//! Key material providers for keytree.
//!
//! ## Overview
//!
//! The core builds trees against the [`KeyProvider`](keytree_core::KeyProvider)
//! trait and never generates keys itself. This crate supplies the concrete
//! providers:
//!
//! - [`X25519Provider`] - random X25519 key pairs as PEM, CBOR token envelopes
//! - [`SeededProvider`] - the same, reproducible from a seed
//! - [`PlaceholderProvider`] - readable stand-in strings
//!
//! ## Transformation Tokens
//!
//! Tokens produced here are [`TokenEnvelope`]s: the edge they were issued
//! for plus 32 bytes of Blake3-derived material. They are identifiers for an
//! external re-encryption scheme, not a re-encryption scheme themselves.
//!
//! ## Usage
//!
//! ```rust
//! use keytree_core::build_tree;
//! use keytree_keys::{TokenEnvelope, X25519Provider};
//!
//! let tree = build_tree(2, &X25519Provider::new()).unwrap();
//! let root = tree.root().unwrap();
//! let token = TokenEnvelope::decode(root.left_re_encryption_key().unwrap()).unwrap();
//! assert_eq!(Some(token.child()), root.left());
//! ```

pub mod crypto;
pub mod error;
pub mod pem;
pub mod provider;
pub mod token;

pub use crypto::{derive_token_material, X25519PublicKey, X25519StaticSecret, TOKEN_DOMAIN};
pub use error::{KeysError, Result};
pub use provider::{PlaceholderProvider, SeededProvider, X25519Provider};
pub use token::{TokenEnvelope, TOKEN_VERSION};
