//! # keytree testkit
//!
//! Testing utilities for keytree.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Expected labels and storage names for known inputs
//! - **Generators**: Proptest strategies for heights and label tables
//! - **Fixtures**: Providers and stores with injectable failures
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use keytree_testkit::generators::height;
//! use keytree_testkit::fixtures::TestFixture;
//!
//! proptest! {
//!     #[test]
//!     fn trees_are_consistent(h in height()) {
//!         let tree = TestFixture::new().tree(h).unwrap();
//!         prop_assert!(tree.check_invariants().is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use keytree_testkit::fixtures::FlakyStore;
//! use keytree_testkit::TestFixture;
//! use keytree::KeyExporter;
//!
//! let fixture = TestFixture::new();
//! let tree = fixture.tree(2).unwrap();
//!
//! let store = FlakyStore::failing(["node_3_private"]);
//! let report = KeyExporter::new(&store).export(&tree, "keys").unwrap();
//! assert_eq!(report.failures().len(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{CountingProvider, FailingProvider, FlakyStore, TestFixture};
