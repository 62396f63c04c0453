//! # keytree Store
//!
//! Storage abstraction for exported key records. Provides a trait-based
//! interface with directory, SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The exporter writes through the [`Storage`] trait, so it does not care
//! where records land. The primary implementation is [`DirectoryStore`]
//! (one `.pem` file per record), with [`SqliteStore`] for single-file
//! archives and [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Storage`] - The trait for all storage operations
//! - [`DirectoryStore`] - Files under a base directory
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keytree_store::{DirectoryStore, Storage};
//!
//! let store = DirectoryStore::new("/var/lib/keytree");
//! store.ensure_container("node_keys").unwrap();
//! store.write("node_keys", "0_public", b"...").unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Explicit containers**: writes into a missing container fail
//! - **Idempotent writes**: writing the same name twice overwrites
//! - **Safe names**: record names with path separators are rejected

pub mod error;
pub mod fs;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use fs::DirectoryStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{sanitize_identifier, validate_name, Storage};
