//! In-memory implementation of the Storage trait.
//!
//! This is primarily for testing. It has the same semantics as the other
//! backends but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};
use crate::traits::{validate_name, Storage};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,

    /// Successful writes since creation, including overwrites.
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `write` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.read_guard()
            .map(|inner| inner.contains_key(container))
            .unwrap_or(false)
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<String, BTreeMap<String, Vec<u8>>>>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_guard(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, BTreeMap<String, Vec<u8>>>>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStore {
    fn ensure_container(&self, container: &str) -> Result<()> {
        self.write_guard()?.entry(container.to_owned()).or_default();
        Ok(())
    }

    fn write(&self, container: &str, name: &str, content: &[u8]) -> Result<()> {
        validate_name(name)?;
        let mut inner = self.write_guard()?;
        let records = inner
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_owned()))?;

        records.insert(name.to_owned(), content.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self, container: &str, name: &str) -> Result<Option<Vec<u8>>> {
        let inner = self.read_guard()?;
        Ok(inner
            .get(container)
            .and_then(|records| records.get(name))
            .cloned())
    }

    fn list(&self, container: &str) -> Result<Vec<String>> {
        let inner = self.read_guard()?;
        Ok(inner
            .get(container)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_container() {
        let store = MemoryStore::new();
        let err = store.write("keys", "a_public", b"x").unwrap_err();

        assert!(matches!(err, StoreError::ContainerNotFound(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_write_read_list() {
        let store = MemoryStore::new();
        store.ensure_container("keys").unwrap();
        store.write("keys", "b_public", b"pub").unwrap();
        store.write("keys", "a_private", b"sec").unwrap();

        assert_eq!(store.read("keys", "b_public").unwrap().unwrap(), b"pub");
        assert_eq!(store.read("keys", "missing").unwrap(), None);
        assert_eq!(store.list("keys").unwrap(), ["a_private", "b_public"]);
        assert!(store.list("other").unwrap().is_empty());
    }

    #[test]
    fn test_overwrite() {
        let store = MemoryStore::new();
        store.ensure_container("keys").unwrap();
        store.write("keys", "a_public", b"one").unwrap();
        store.write("keys", "a_public", b"two").unwrap();

        assert_eq!(store.read("keys", "a_public").unwrap().unwrap(), b"two");
        assert_eq!(store.list("keys").unwrap().len(), 1);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_ensure_container_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_container("keys").unwrap();
        store.write("keys", "a_public", b"x").unwrap();
        store.ensure_container("keys").unwrap();

        assert!(store.has_container("keys"));
        assert_eq!(store.list("keys").unwrap().len(), 1);
    }
}
