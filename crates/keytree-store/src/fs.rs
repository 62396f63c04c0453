//! Directory-backed implementation of the Storage trait.
//!
//! Each container is a directory under a base path and each record is one
//! file. By default records get a `.pem` suffix, so `0_public` is written to
//! `<base>/<container>/0_public.pem`.
//!
//! Records are written to a temporary file, synced, and renamed into place,
//! so a reader never sees a half-written key. On Unix, record files are
//! created owner-only (`0o600`) and container directories are `0o700`.
//!
//! Record names are lower-cased so that two identifiers differing only in
//! case cannot overwrite each other on a case-insensitive filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::{sanitize_identifier, validate_name, Storage};

/// Default file extension for key records.
pub const DEFAULT_EXTENSION: &str = "pem";

/// Owner read/write.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Owner read/write/search.
pub const DEFAULT_DIR_MODE: u32 = 0o700;

/// Suffix of in-flight writes; never listed as a record.
const TEMP_SUFFIX: &str = ".keytree-tmp";

/// Filesystem store: one directory per container, one file per record.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    base: PathBuf,
    extension: Option<String>,
    file_mode: u32,
    dir_mode: u32,
}

impl DirectoryStore {
    /// Store rooted at `base`, writing owner-only `.pem` files.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            extension: Some(DEFAULT_EXTENSION.to_owned()),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    /// Change (or with `None`, drop) the record file extension.
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(str::to_owned);
        self
    }

    /// Unix permission bits for record files and container directories.
    /// Ignored on other platforms.
    pub fn with_modes(mut self, file_mode: u32, dir_mode: u32) -> Self {
        self.file_mode = file_mode;
        self.dir_mode = dir_mode;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory backing a container.
    pub fn container_path(&self, container: &str) -> PathBuf {
        self.base.join(container)
    }

    /// File backing a record.
    pub fn record_path(&self, container: &str, name: &str) -> PathBuf {
        let file = match &self.extension {
            Some(ext) => format!("{}.{}", name, ext),
            None => name.to_owned(),
        };
        self.container_path(container).join(file)
    }

    fn record_name(&self, path: &Path) -> Option<String> {
        let file = path.file_name()?.to_str()?;
        if file.ends_with(TEMP_SUFFIX) {
            return None;
        }
        match &self.extension {
            Some(ext) => file
                .strip_suffix(ext.as_str())
                .and_then(|stem| stem.strip_suffix('.'))
                .map(str::to_owned),
            None => Some(file.to_owned()),
        }
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        let result: io::Result<()> = (|| {
            let mut file = open_private(&tmp, self.file_mode)?;
            file.write_all(content)?;
            file.sync_all()?;
            // A stale temp file keeps its old mode through `create`.
            set_mode(&tmp, self.file_mode)?;
            fs::rename(&tmp, path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

#[cfg(unix)]
fn open_private(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

impl Storage for DirectoryStore {
    fn ensure_container(&self, container: &str) -> Result<()> {
        let dir = self.container_path(container);
        fs::create_dir_all(&dir)?;
        set_mode(&dir, self.dir_mode)?;
        debug!(dir = %dir.display(), "container ready");
        Ok(())
    }

    fn write(&self, container: &str, name: &str, content: &[u8]) -> Result<()> {
        validate_name(name)?;
        if !self.container_path(container).is_dir() {
            return Err(StoreError::ContainerNotFound(container.to_owned()));
        }

        let path = self.record_path(container, name);
        self.write_atomic(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "record written");
        Ok(())
    }

    fn read(&self, container: &str, name: &str) -> Result<Option<Vec<u8>>> {
        validate_name(name)?;
        match fs::read(self.record_path(container, name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, container: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(self.container_path(container)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = self.record_name(&entry.path()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn sanitize_name(&self, identifier: &str) -> String {
        sanitize_identifier(identifier).to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_container_creates_nested_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());

        store.ensure_container("out/node_keys").unwrap();
        assert!(tmp.path().join("out/node_keys").is_dir());

        // Second call is a no-op.
        store.ensure_container("out/node_keys").unwrap();
    }

    #[test]
    fn test_write_uses_pem_files() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());
        store.ensure_container("keys").unwrap();
        store.write("keys", "0_public", b"enc_key_0").unwrap();

        let on_disk = fs::read(tmp.path().join("keys/0_public.pem")).unwrap();
        assert_eq!(on_disk, b"enc_key_0");
        assert_eq!(store.read("keys", "0_public").unwrap().unwrap(), b"enc_key_0");
        assert_eq!(store.list("keys").unwrap(), ["0_public"]);
    }

    #[test]
    fn test_write_without_container_fails() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());

        let err = store.write("missing", "0_public", b"x").unwrap_err();
        assert!(matches!(err, StoreError::ContainerNotFound(_)));
    }

    #[test]
    fn test_overwrite_and_binary_content() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path()).with_extension(None);
        store.ensure_container("keys").unwrap();

        let binary: Vec<u8> = (0..=255).collect();
        store.write("keys", "k", b"old").unwrap();
        store.write("keys", "k", &binary).unwrap();

        assert_eq!(store.read("keys", "k").unwrap().unwrap(), binary);
        assert!(tmp.path().join("keys/k").is_file());
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());
        store.ensure_container("keys").unwrap();
        store.write("keys", "b_private", b"x").unwrap();
        store.write("keys", "a_public", b"y").unwrap();
        fs::write(tmp.path().join("keys/notes.txt"), b"z").unwrap();
        fs::create_dir(tmp.path().join("keys/sub.pem")).unwrap();

        assert_eq!(store.list("keys").unwrap(), ["a_public", "b_private"]);
        assert!(store.list("nothing-here").unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_records_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());
        store.ensure_container("keys").unwrap();
        store.write("keys", "0_private", b"dec_key_0").unwrap();

        let file = fs::metadata(tmp.path().join("keys/0_private.pem")).unwrap();
        assert_eq!(file.permissions().mode() & 0o077, 0);
        let dir = fs::metadata(tmp.path().join("keys")).unwrap();
        assert_eq!(dir.permissions().mode() & 0o077, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_tightens_loose_file() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());
        store.ensure_container("keys").unwrap();
        let path = tmp.path().join("keys/0_private.pem");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        store.write("keys", "0_private", b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path()).with_extension(None);
        store.ensure_container("keys").unwrap();
        store.write("keys", "a", b"1").unwrap();
        store.write("keys", "a", b"2").unwrap();
        fs::write(tmp.path().join("keys/b.keytree-tmp"), b"stale").unwrap();

        let on_disk: Vec<String> = fs::read_dir(tmp.path().join("keys"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|f| f != "b.keytree-tmp")
            .collect();
        assert_eq!(on_disk, ["a"]);
        assert_eq!(store.list("keys").unwrap(), ["a"]);
    }

    #[test]
    fn test_names_fold_case() {
        let store = DirectoryStore::new("unused");

        assert_eq!(store.sanitize_name("Alice (Admin)"), "alice_admin");
        assert_eq!(store.sanitize_name("A"), store.sanitize_name("a"));
        assert_eq!(store.sanitize_name("13"), "13");
    }

    #[test]
    fn test_rejects_path_names() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::new(tmp.path());
        store.ensure_container("keys").unwrap();

        let err = store.write("keys", "../escape", b"x").unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }
}
