//! # keytree Core
//!
//! Pure primitives for keytree: full binary trees of key-bearing identities.
//!
//! This crate contains no I/O. Key material comes from a [`KeyProvider`];
//! persisting it is the job of the `keytree-store` and `keytree` crates.
//!
//! ## Key Types
//!
//! - [`KeyTree`] - Flat arena of nodes in level order
//! - [`Node`] - One identity: key pair, links, and per-edge tokens
//! - [`NodeIndex`] - Structural index (root = 0, children at `2i+1`/`2i+2`)
//! - [`LabelTable`] - Display labels keyed by structural index
//!
//! ## Lifecycle
//!
//! 1. [`build_tree`] allocates every node with a fresh key pair, then wires
//!    the topology and attaches transformation tokens to internal nodes.
//! 2. [`relabel`] overwrites display labels in one level-order pass.
//! 3. [`KeyTree::pre_order`] and [`KeyTree::level_order`] walk the result.

pub mod builder;
pub mod error;
pub mod label;
pub mod node;
pub mod provider;
pub mod topology;
pub mod traversal;
pub mod tree;
pub mod types;

pub use builder::{build_tree, TreeBuilder};
pub use error::{CoreError, KeyGenError, Result};
pub use label::{default_label, relabel, IdentityAssigner, LabelTable, RelabelSummary};
pub use node::Node;
pub use provider::KeyProvider;
pub use topology::MAX_HEIGHT;
pub use traversal::{Edge, Layout, LevelOrder, PreOrder, TraversalEntry};
pub use tree::KeyTree;
pub use types::{KeyPair, NodeIndex, PublicKeyBlob, SecretKeyBlob, TransformationToken};
