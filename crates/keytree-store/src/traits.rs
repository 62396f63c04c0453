//! Storage trait: the abstract interface for key record persistence.
//!
//! This trait keeps the exporter independent of where records end up.
//! Implementations include a directory of files (primary), SQLite, and
//! in-memory (for tests).

use crate::error::{Result, StoreError};

/// Named byte records grouped into containers.
///
/// # Design Notes
///
/// - **Containers first**: a container must be created with
///   [`ensure_container`](Storage::ensure_container) before anything is
///   written into it.
/// - **Overwrite semantics**: writing an existing name replaces its content,
///   so repeating an export is idempotent.
/// - **Byte-exact**: content is stored and returned without re-encoding.
pub trait Storage: Send + Sync {
    /// Create the container if it does not exist. Idempotent.
    fn ensure_container(&self, container: &str) -> Result<()>;

    /// Write (or overwrite) a record.
    fn write(&self, container: &str, name: &str, content: &[u8]) -> Result<()>;

    /// Read a record back, if present.
    fn read(&self, container: &str, name: &str) -> Result<Option<Vec<u8>>>;

    /// Names of all records in a container, sorted.
    fn list(&self, container: &str) -> Result<Vec<String>>;

    /// Map a display identifier onto a name this backend can store.
    fn sanitize_name(&self, identifier: &str) -> String {
        sanitize_identifier(identifier)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn ensure_container(&self, container: &str) -> Result<()> {
        (**self).ensure_container(container)
    }

    fn write(&self, container: &str, name: &str, content: &[u8]) -> Result<()> {
        (**self).write(container, name, content)
    }

    fn read(&self, container: &str, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(container, name)
    }

    fn list(&self, container: &str) -> Result<Vec<String>> {
        (**self).list(container)
    }

    fn sanitize_name(&self, identifier: &str) -> String {
        (**self).sanitize_name(identifier)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn ensure_container(&self, container: &str) -> Result<()> {
        (**self).ensure_container(container)
    }

    fn write(&self, container: &str, name: &str, content: &[u8]) -> Result<()> {
        (**self).write(container, name, content)
    }

    fn read(&self, container: &str, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(container, name)
    }

    fn list(&self, container: &str) -> Result<Vec<String>> {
        (**self).list(container)
    }

    fn sanitize_name(&self, identifier: &str) -> String {
        (**self).sanitize_name(identifier)
    }
}

/// Default identifier sanitizer.
///
/// Spaces become `_`, parentheses are dropped, and anything else outside
/// `[A-Za-z0-9._-]` becomes `_`. So `"1 (U1)"` is stored as `1_U1`.
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Reject record names that could escape their container.
pub fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}
