//! # keytree
//!
//! The unified API for building, labeling and exporting key trees for
//! proxy re-encryption.
//!
//! ## Overview
//!
//! A key tree is a full binary tree in which every node is an identity with
//! its own key pair, and every parent-child edge carries a transformation
//! token that lets a ciphertext for the parent be re-encrypted for the
//! child. Leaves are end users; internal nodes are aggregation points.
//!
//! This crate provides:
//!
//! - **Pipeline**: build, relabel, walk and export in one explicit run
//! - **Export**: two records per node through any storage backend, with
//!   collision checks before the first write
//! - **Config**: JSON-loadable run configuration
//! - **Render**: hand-off of edges and a layout hint to an external visualizer
//!
//! ## Key Concepts
//!
//! - **Structural index**: root is 0, children of `i` are `2i+1` and `2i+2`.
//! - **Identifier**: display label only. Never used for structure.
//! - **Record**: `{name}_public` or `{name}_private` inside a destination
//!   container, where `name` is the sanitized identifier.
//!
//! ## Usage
//!
//! ```rust
//! use keytree::{KeyTreeConfig, Pipeline};
//! use keytree::keys::PlaceholderProvider;
//! use keytree::store::{MemoryStore, Storage};
//!
//! let store = MemoryStore::new();
//! let pipeline = Pipeline::new(PlaceholderProvider::new(), &store, KeyTreeConfig::default());
//!
//! let outcome = pipeline.run().unwrap();
//! assert_eq!(outcome.tree.len(), 15);
//! assert!(outcome.export.is_complete());
//! assert_eq!(store.list("node_keys").unwrap().len(), 30);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `keytree::core` - Tree model, builder, labels and traversal
//! - `keytree::keys` - X25519 providers and token envelopes
//! - `keytree::store` - Storage abstraction and backends

pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod render;

// Re-export component crates
pub use keytree_core as core;
pub use keytree_keys as keys;
pub use keytree_store as store;

// Re-export main types for convenience
pub use config::{BackendKind, KeyTreeConfig, ProviderKind};
pub use error::{KeyTreeError, Result};
pub use export::{preflight, ExportReport, KeyExporter, NodeExport, RecordKind, RecordOutcome};
pub use pipeline::{Pipeline, RunOutcome};
pub use render::{render_tree, Renderer};

// Re-export commonly used core types
pub use keytree_core::{
    build_tree, relabel, KeyPair, KeyProvider, KeyTree, LabelTable, Node, NodeIndex,
    RelabelSummary, TransformationToken,
};
