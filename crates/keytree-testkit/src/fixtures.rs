//! Test fixtures and helpers.
//!
//! Providers and stores with controllable failure behavior, plus a fixture
//! bundling a deterministic provider with an in-memory store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use keytree::{KeyTreeConfig, Pipeline};
use keytree_core::{
    build_tree, KeyGenError, KeyPair, KeyProvider, KeyTree, NodeIndex, Result as CoreResult,
    TransformationToken,
};
use keytree_keys::{PlaceholderProvider, SeededProvider};
use keytree_store::{MemoryStore, Result as StoreResult, Storage, StoreError};

/// Provider that fails on a chosen call.
///
/// Key pair requests are counted separately from token requests; the first
/// `key_pairs_before_failure` key pairs succeed and the next one fails.
/// Tokens can be made to fail independently.
pub struct FailingProvider {
    inner: PlaceholderProvider,
    key_pairs_before_failure: Option<usize>,
    fail_tokens: bool,
    key_pairs: AtomicUsize,
}

impl FailingProvider {
    /// Fail the key pair request after `n` successful ones.
    pub fn key_pair_after(n: usize) -> Self {
        Self {
            inner: PlaceholderProvider::new(),
            key_pairs_before_failure: Some(n),
            fail_tokens: false,
            key_pairs: AtomicUsize::new(0),
        }
    }

    /// Succeed on key pairs, fail every token.
    pub fn tokens() -> Self {
        Self {
            inner: PlaceholderProvider::new(),
            key_pairs_before_failure: None,
            fail_tokens: true,
            key_pairs: AtomicUsize::new(0),
        }
    }
}

impl KeyProvider for FailingProvider {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        let n = self.key_pairs.fetch_add(1, Ordering::SeqCst);
        if self.key_pairs_before_failure.is_some_and(|limit| n >= limit) {
            return Err(KeyGenError::KeyPair(format!("injected failure at call {}", n)));
        }
        self.inner.generate_key_pair()
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        if self.fail_tokens {
            return Err(KeyGenError::Token {
                parent,
                child,
                reason: "injected failure".into(),
            });
        }
        self.inner.generate_transformation_token(parent, child)
    }
}

/// Provider that records how often it was asked for material.
#[derive(Default)]
pub struct CountingProvider {
    inner: PlaceholderProvider,
    key_pairs: AtomicUsize,
    tokens: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pairs(&self) -> usize {
        self.key_pairs.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }
}

impl KeyProvider for CountingProvider {
    fn generate_key_pair(&self) -> Result<KeyPair, KeyGenError> {
        self.key_pairs.fetch_add(1, Ordering::SeqCst);
        self.inner.generate_key_pair()
    }

    fn generate_transformation_token(
        &self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<TransformationToken, KeyGenError> {
        self.tokens.fetch_add(1, Ordering::SeqCst);
        self.inner.generate_transformation_token(parent, child)
    }
}

/// In-memory store that refuses to write chosen record names.
///
/// Everything else is delegated to a [`MemoryStore`].
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: HashSet<String>,
}

impl FlakyStore {
    pub fn failing<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            inner: MemoryStore::new(),
            failing: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl Storage for FlakyStore {
    fn ensure_container(&self, container: &str) -> StoreResult<()> {
        self.inner.ensure_container(container)
    }

    fn write(&self, container: &str, name: &str, content: &[u8]) -> StoreResult<()> {
        if self.failing.contains(name) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("injected failure writing {}", name),
            )));
        }
        self.inner.write(container, name, content)
    }

    fn read(&self, container: &str, name: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.read(container, name)
    }

    fn list(&self, container: &str) -> StoreResult<Vec<String>> {
        self.inner.list(container)
    }
}

/// A deterministic provider and an in-memory store.
pub struct TestFixture {
    pub provider: SeededProvider,
    pub store: MemoryStore,
}

impl TestFixture {
    /// Fixture with a fixed seed.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            provider: SeededProvider::from_seed(seed),
            store: MemoryStore::new(),
        }
    }

    /// Build a tree from the fixture's provider.
    pub fn tree(&self, height: i64) -> CoreResult<KeyTree> {
        build_tree(height, &self.provider)
    }

    /// Pipeline over the fixture's provider and store.
    pub fn pipeline(&self, config: KeyTreeConfig) -> Pipeline<&SeededProvider, &MemoryStore> {
        Pipeline::new(&self.provider, &self.store, config)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
