//! The pipeline: build, relabel and export a key tree in one explicit run.
//!
//! The pipeline owns its provider, storage backend and configuration, and
//! hands the finished tree back to the caller. There is no global tree.

use tracing::{debug, info, info_span, warn};

use keytree_core::{build_tree, relabel, KeyProvider, KeyTree, RelabelSummary};
use keytree_store::Storage;

use crate::config::KeyTreeConfig;
use crate::error::Result;
use crate::export::{ExportReport, KeyExporter};

/// Everything a full run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub tree: KeyTree,
    pub relabel: RelabelSummary,
    pub export: ExportReport,
}

/// Builds, relabels and exports key trees.
///
/// Provides a unified API for:
/// - Building a tree with fresh key material
/// - Applying the configured display labels
/// - Logging a diagnostic walk of the tree
/// - Exporting every node's key pair
pub struct Pipeline<P, S> {
    provider: P,
    exporter: KeyExporter<S>,
    config: KeyTreeConfig,
}

impl<P: KeyProvider, S: Storage> Pipeline<P, S> {
    pub fn new(provider: P, storage: S, config: KeyTreeConfig) -> Self {
        Self {
            provider,
            exporter: KeyExporter::new(storage),
            config,
        }
    }

    pub fn config(&self) -> &KeyTreeConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        self.exporter.storage()
    }

    /// Build a tree of the configured height.
    pub fn build(&self) -> Result<KeyTree> {
        let _span = info_span!("build", height = self.config.height).entered();

        let tree = build_tree(self.config.height, &self.provider)?;
        if tree.is_empty() {
            info!("height below 1, nothing to build");
            return Ok(tree);
        }

        tree.check_invariants()?;
        info!(
            nodes = tree.len(),
            leaves = tree.leaves().count(),
            "tree built"
        );
        Ok(tree)
    }

    /// Apply the configured label table.
    pub fn relabel(&self, tree: &mut KeyTree) -> RelabelSummary {
        let summary = relabel(tree, &self.config.labels, keytree_core::default_label);
        if !summary.unused_entries.is_empty() {
            warn!(
                unused = ?summary.unused_entries,
                "label table names indices outside the tree"
            );
        }
        info!(
            relabeled = summary.relabeled,
            from_table = summary.from_table,
            "nodes relabeled"
        );
        summary
    }

    /// Log a pre-order walk of the tree at debug level.
    pub fn trace(&self, tree: &KeyTree) {
        for entry in tree.pre_order() {
            debug!(
                depth = entry.depth,
                identifier = entry.identifier,
                is_left = ?entry.is_left,
                parent = entry.parent_identifier.unwrap_or("None"),
                "node"
            );
        }
    }

    /// Export the tree into the configured destination.
    pub fn export(&self, tree: &KeyTree) -> Result<ExportReport> {
        let _span = info_span!("export", destination = %self.config.destination).entered();
        self.exporter.export(tree, &self.config.destination)
    }

    /// Build, relabel, trace and export.
    pub fn run(&self) -> Result<RunOutcome> {
        let mut tree = self.build()?;
        let relabel = self.relabel(&mut tree);
        self.trace(&tree);
        let export = self.export(&tree)?;

        Ok(RunOutcome {
            tree,
            relabel,
            export,
        })
    }
}

impl KeyTreeConfig {
    /// Pipeline over the configured provider and backend.
    pub fn pipeline(self) -> Result<Pipeline<Box<dyn KeyProvider>, Box<dyn Storage>>> {
        let provider = self.key_provider();
        let storage = self.open_storage()?;
        Ok(Pipeline::new(provider, storage, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use keytree_keys::PlaceholderProvider;
    use keytree_store::MemoryStore;

    fn config(height: i64) -> KeyTreeConfig {
        KeyTreeConfig {
            height,
            provider: ProviderKind::Placeholder,
            ..KeyTreeConfig::default()
        }
    }

    #[test]
    fn test_run_diagram_tree() {
        let store = MemoryStore::new();
        let pipeline = Pipeline::new(PlaceholderProvider::new(), &store, config(3));
        let outcome = pipeline.run().unwrap();

        assert_eq!(outcome.tree.root().unwrap().identifier(), "0");
        assert_eq!(outcome.relabel.relabeled, 15);
        assert_eq!(outcome.relabel.from_table, 15);
        assert_eq!(outcome.export.records_written(), 30);
        assert_eq!(store.list("node_keys").unwrap().len(), 30);
    }

    #[test]
    fn test_run_empty() {
        let store = MemoryStore::new();
        let outcome = Pipeline::new(PlaceholderProvider::new(), &store, config(0))
            .run()
            .unwrap();

        assert!(outcome.tree.is_empty());
        assert_eq!(outcome.export.records_written(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_smaller_tree_leaves_table_entries_unused() {
        let store = MemoryStore::new();
        let outcome = Pipeline::new(PlaceholderProvider::new(), &store, config(1))
            .run()
            .unwrap();

        assert_eq!(outcome.relabel.unused_entries, (3..15).collect::<Vec<u64>>());
        assert_eq!(outcome.tree.root().unwrap().identifier(), "0");
    }

    #[test]
    fn test_config_pipeline_boxes() {
        let pipeline = KeyTreeConfig {
            backend: crate::config::BackendKind::Memory,
            ..config(2)
        }
        .pipeline()
        .unwrap();

        let outcome = pipeline.run().unwrap();
        assert_eq!(outcome.export.records_written(), 14);
        assert_eq!(pipeline.storage().list("node_keys").unwrap().len(), 14);
    }
}
