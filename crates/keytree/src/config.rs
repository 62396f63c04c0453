//! Run configuration.
//!
//! A configuration names the tree height, the label table, where the keys
//! go and which provider and backend to use. It can be loaded from JSON;
//! every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use keytree_core::{KeyProvider, LabelTable};
use keytree_keys::{PlaceholderProvider, X25519Provider};
use keytree_store::{DirectoryStore, MemoryStore, SqliteStore, Storage};

use crate::error::{KeyTreeError, Result};

/// Default export container.
pub const DEFAULT_DESTINATION: &str = "node_keys";

/// Default SQLite file when the sqlite backend is chosen without a path.
pub const DEFAULT_SQLITE_FILE: &str = "keytree.db";

/// Which key provider builds the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Random X25519 key pairs.
    #[default]
    X25519,
    /// Readable stand-in strings.
    Placeholder,
}

/// Where exported records are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One file per record under `base_dir`.
    #[default]
    Directory,
    /// Single SQLite database.
    Sqlite,
    /// Discarded at exit; useful for dry runs.
    Memory,
}

/// Configuration for a keytree run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyTreeConfig {
    /// Tree height in edges. Values below 1 produce an empty run.
    pub height: i64,
    /// Display labels by structural index.
    pub labels: LabelTable,
    /// Export container (directory name for the directory backend).
    pub destination: String,
    pub provider: ProviderKind,
    pub backend: BackendKind,
    /// Base directory for the directory backend.
    pub base_dir: PathBuf,
    /// Database file for the sqlite backend.
    pub sqlite_path: Option<PathBuf>,
}

impl Default for KeyTreeConfig {
    fn default() -> Self {
        Self {
            height: 3,
            labels: LabelTable::diagram(),
            destination: DEFAULT_DESTINATION.to_owned(),
            provider: ProviderKind::default(),
            backend: BackendKind::default(),
            base_dir: PathBuf::from("."),
            sqlite_path: None,
        }
    }
}

impl KeyTreeConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            KeyTreeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(KeyTreeError::Config("destination must not be empty".into()));
        }
        Ok(())
    }

    /// Instantiate the configured key provider.
    pub fn key_provider(&self) -> Box<dyn KeyProvider> {
        match self.provider {
            ProviderKind::X25519 => Box::new(X25519Provider::new()),
            ProviderKind::Placeholder => Box::new(PlaceholderProvider::new()),
        }
    }

    /// Open the configured storage backend.
    pub fn open_storage(&self) -> Result<Box<dyn Storage>> {
        Ok(match self.backend {
            BackendKind::Directory => Box::new(DirectoryStore::new(&self.base_dir)),
            BackendKind::Sqlite => {
                let path = self
                    .sqlite_path
                    .clone()
                    .unwrap_or_else(|| self.base_dir.join(DEFAULT_SQLITE_FILE));
                Box::new(SqliteStore::open(path)?)
            }
            BackendKind::Memory => Box::new(MemoryStore::new()),
        })
    }
}
