//! Error types for keytree.

use keytree_core::{CoreError, NodeIndex};
use keytree_store::StoreError;
use thiserror::Error;

/// Errors that can occur during keytree operations.
#[derive(Debug, Error)]
pub enum KeyTreeError {
    /// Tree construction error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error outside per-record writes.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Two nodes would be exported under the same record name.
    #[error("identifier collision: nodes {first} and {second} both export as {name:?}")]
    IdentifierCollision {
        name: String,
        first: NodeIndex,
        second: NodeIndex,
    },

    /// A node's identifier sanitizes to nothing.
    #[error("identifier {identifier:?} of node {index} has no storable characters")]
    EmptyIdentifier {
        index: NodeIndex,
        identifier: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for keytree operations.
pub type Result<T> = std::result::Result<T, KeyTreeError>;
