//! Key tree generation tool.
//!
//! Builds a key tree, applies display labels and exports every node's key
//! pair as two records.
//!
//! # Usage
//!
//! ```bash
//! # Height-3 tree with the diagram labels into ./node_keys
//! keytree
//!
//! # Taller tree with default labels into a SQLite database
//! keytree --height 5 --no-labels --backend sqlite --sqlite-path keys.db
//!
//! # Everything from a config file, with debug output
//! RUST_LOG=debug keytree --config keytree.json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use keytree::{BackendKind, KeyTreeConfig, LabelTable, ProviderKind};

/// Key tree generation tool.
#[derive(Parser, Debug)]
#[command(name = "keytree")]
#[command(about = "Build a re-encryption key tree and export its key pairs")]
#[command(version)]
struct Cli {
    /// JSON configuration file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tree height in edges. Values below 1 build nothing.
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Destination container for the exported records.
    #[arg(long)]
    destination: Option<String>,

    /// Base directory for the directory backend.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Key provider.
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Storage backend.
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Database file for the sqlite backend.
    #[arg(long)]
    sqlite_path: Option<PathBuf>,

    /// Ignore the label table and use default labels only.
    #[arg(long)]
    no_labels: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<KeyTreeConfig> {
        let mut config = match &self.config {
            Some(path) => KeyTreeConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => KeyTreeConfig::default(),
        };

        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(destination) = self.destination {
            config.destination = destination;
        }
        if let Some(base_dir) = self.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(sqlite_path) = self.sqlite_path {
            config.sqlite_path = Some(sqlite_path);
        }
        if self.no_labels {
            config.labels = LabelTable::new();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = cli.into_config()?;
    info!(
        height = config.height,
        destination = %config.destination,
        provider = ?config.provider,
        backend = ?config.backend,
        "starting keytree"
    );

    let pipeline = config.pipeline().context("opening storage backend")?;
    let outcome = pipeline.run()?;

    let failures = outcome.export.failures();
    for (node, record) in &failures {
        if let Err(e) = &record.result {
            error!(node = %node.index, record = %record.name, error = %e, "record not written");
        }
    }
    if !failures.is_empty() {
        bail!(
            "{} of {} records could not be written to {}",
            failures.len(),
            outcome.export.nodes.len() * 2,
            outcome.export.destination
        );
    }

    info!(
        nodes = outcome.tree.len(),
        records = outcome.export.records_written(),
        destination = %outcome.export.destination,
        "done"
    );
    Ok(())
}
