//! SQLite implementation of the Storage trait.
//!
//! Keeps every exported record of every container in a single database
//! file. Uses rusqlite with bundled SQLite.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{validate_name, Storage};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute an operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(format!("sqlite connection: {}", e)))?;
        f(&conn)
    }

    fn container_exists(conn: &Connection, container: &str) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM containers WHERE name = ?1",
                params![container],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl Storage for SqliteStore {
    fn ensure_container(&self, container: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO containers (name, created_at) VALUES (?1, ?2)",
                params![container, now_millis()],
            )?;
            Ok(())
        })
    }

    fn write(&self, container: &str, name: &str, content: &[u8]) -> Result<()> {
        validate_name(name)?;
        self.with_conn(|conn| {
            if !Self::container_exists(conn, container)? {
                return Err(StoreError::ContainerNotFound(container.to_owned()));
            }

            conn.execute(
                "INSERT INTO records (container, name, content, written_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (container, name)
                 DO UPDATE SET content = excluded.content, written_at = excluded.written_at",
                params![container, name, content, now_millis()],
            )?;
            debug!(container, name, bytes = content.len(), "record written");
            Ok(())
        })
    }

    fn read(&self, container: &str, name: &str) -> Result<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT content FROM records WHERE container = ?1 AND name = ?2",
                params![container, name],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })
    }

    fn list(&self, container: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT name FROM records WHERE container = ?1 ORDER BY name")?;
            let names = stmt
                .query_map(params![container], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(names)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let store = SqliteStore::open_memory().unwrap();
        store.ensure_container("node_keys").unwrap();
        store.write("node_keys", "0_public", b"enc").unwrap();
        store.write("node_keys", "0_private", b"dec").unwrap();

        assert_eq!(store.read("node_keys", "0_public").unwrap().unwrap(), b"enc");
        assert_eq!(store.read("node_keys", "0_private").unwrap().unwrap(), b"dec");
        assert_eq!(store.read("node_keys", "1_public").unwrap(), None);
        assert_eq!(store.list("node_keys").unwrap(), ["0_private", "0_public"]);
    }

    #[test]
    fn test_overwrite_keeps_one_row() {
        let store = SqliteStore::open_memory().unwrap();
        store.ensure_container("c").unwrap();
        store.write("c", "k", b"first").unwrap();
        store.write("c", "k", b"second").unwrap();

        assert_eq!(store.read("c", "k").unwrap().unwrap(), b"second");
        assert_eq!(store.list("c").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_container() {
        let store = SqliteStore::open_memory().unwrap();
        let err = store.write("nope", "k", b"x").unwrap_err();

        assert!(matches!(err, StoreError::ContainerNotFound(_)));
        assert!(store.list("nope").unwrap().is_empty());
    }

    #[test]
    fn test_containers_are_separate() {
        let store = SqliteStore::open_memory().unwrap();
        store.ensure_container("a").unwrap();
        store.ensure_container("b").unwrap();
        store.write("a", "k", b"from-a").unwrap();
        store.write("b", "k", b"from-b").unwrap();

        assert_eq!(store.read("a", "k").unwrap().unwrap(), b"from-a");
        assert_eq!(store.read("b", "k").unwrap().unwrap(), b"from-b");
    }

    #[test]
    fn test_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("keys.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.ensure_container("node_keys").unwrap();
            store.write("node_keys", "0_public", &[0u8, 1, 2, 255]).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.read("node_keys", "0_public").unwrap().unwrap(),
            [0u8, 1, 2, 255]
        );
    }
}
