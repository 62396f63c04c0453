//! Key export: two records per node, written through a [`Storage`] backend.
//!
//! For every node, in level order, the exporter writes `{name}_public`
//! holding the encryption key and `{name}_private` holding the decryption
//! key, where `name` is the node's sanitized identifier.
//!
//! Export is split in two phases:
//!
//! 1. **Pre-flight**: every identifier is sanitized and checked for
//!    collisions. A collision aborts the export before anything is written.
//! 2. **Write**: the destination container is created, then each record is
//!    written. A failed record is reported and the export carries on.

use std::collections::HashMap;

use tracing::{info, warn};

use keytree_core::{KeyTree, NodeIndex};
use keytree_store::{Storage, StoreError};

use crate::error::{KeyTreeError, Result};

/// Suffix of the record holding a node's encryption key.
pub const PUBLIC_SUFFIX: &str = "_public";

/// Suffix of the record holding a node's decryption key.
pub const PRIVATE_SUFFIX: &str = "_private";

/// Which half of a key pair a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Public,
    Private,
}

impl RecordKind {
    pub fn record_name(self, node_name: &str) -> String {
        match self {
            RecordKind::Public => format!("{}{}", node_name, PUBLIC_SUFFIX),
            RecordKind::Private => format!("{}{}", node_name, PRIVATE_SUFFIX),
        }
    }
}

/// A node scheduled for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNode {
    pub index: NodeIndex,
    pub identifier: String,
    /// Sanitized storage name.
    pub name: String,
}

/// Outcome of writing one record.
#[derive(Debug)]
pub struct RecordOutcome {
    pub kind: RecordKind,
    pub name: String,
    pub result: std::result::Result<(), StoreError>,
}

impl RecordOutcome {
    pub fn is_written(&self) -> bool {
        self.result.is_ok()
    }
}

/// Both record outcomes for one node.
#[derive(Debug)]
pub struct NodeExport {
    pub index: NodeIndex,
    pub identifier: String,
    pub name: String,
    pub public: RecordOutcome,
    pub private: RecordOutcome,
}

impl NodeExport {
    pub fn records(&self) -> [&RecordOutcome; 2] {
        [&self.public, &self.private]
    }

    pub fn is_complete(&self) -> bool {
        self.public.is_written() && self.private.is_written()
    }
}

/// Aggregated result of an export.
#[derive(Debug)]
pub struct ExportReport {
    pub destination: String,
    pub nodes: Vec<NodeExport>,
}

impl ExportReport {
    pub fn empty(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            nodes: Vec::new(),
        }
    }

    /// Records that were written successfully.
    pub fn records_written(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.records())
            .filter(|r| r.is_written())
            .count()
    }

    /// Every failed record, with the node it belongs to.
    pub fn failures(&self) -> Vec<(&NodeExport, &RecordOutcome)> {
        self.nodes
            .iter()
            .flat_map(|n| n.records().into_iter().map(move |r| (n, r)))
            .filter(|(_, r)| !r.is_written())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.nodes.iter().all(NodeExport::is_complete)
    }
}

/// Sanitize every identifier and reject collisions.
///
/// Returns the nodes in level order. Nothing is written.
pub fn preflight<S: Storage + ?Sized>(tree: &KeyTree, storage: &S) -> Result<Vec<PlannedNode>> {
    let mut seen: HashMap<String, NodeIndex> = HashMap::with_capacity(tree.len());
    let mut plan = Vec::with_capacity(tree.len());

    for node in tree.level_order() {
        let name = storage.sanitize_name(node.identifier());
        if name.is_empty() {
            return Err(KeyTreeError::EmptyIdentifier {
                index: node.index(),
                identifier: node.identifier().to_owned(),
            });
        }
        if let Some(&first) = seen.get(&name) {
            return Err(KeyTreeError::IdentifierCollision {
                name,
                first,
                second: node.index(),
            });
        }
        seen.insert(name.clone(), node.index());

        plan.push(PlannedNode {
            index: node.index(),
            identifier: node.identifier().to_owned(),
            name,
        });
    }

    Ok(plan)
}

/// Writes a tree's key material into a storage backend.
pub struct KeyExporter<S> {
    storage: S,
}

impl<S: Storage> KeyExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Export every node of `tree` into the `destination` container.
    ///
    /// Fails without writing anything on an identifier collision or when
    /// the container cannot be created. Individual record failures are
    /// collected in the report instead.
    pub fn export(&self, tree: &KeyTree, destination: &str) -> Result<ExportReport> {
        if tree.is_empty() {
            return Ok(ExportReport::empty(destination));
        }

        let plan = preflight(tree, &self.storage)?;
        self.storage.ensure_container(destination)?;

        let mut nodes = Vec::with_capacity(plan.len());
        for planned in plan {
            let Some(node) = tree.get(planned.index) else {
                continue;
            };

            let public = self.write_record(
                destination,
                &planned.name,
                RecordKind::Public,
                node.encryption_key().as_bytes(),
            );
            let private = self.write_record(
                destination,
                &planned.name,
                RecordKind::Private,
                node.decryption_key().expose(),
            );

            nodes.push(NodeExport {
                index: planned.index,
                identifier: planned.identifier,
                name: planned.name,
                public,
                private,
            });
        }

        let report = ExportReport {
            destination: destination.to_owned(),
            nodes,
        };
        info!(
            destination,
            nodes = report.nodes.len(),
            written = report.records_written(),
            failed = report.failures().len(),
            "keys exported"
        );
        Ok(report)
    }

    fn write_record(
        &self,
        destination: &str,
        node_name: &str,
        kind: RecordKind,
        content: &[u8],
    ) -> RecordOutcome {
        let name = kind.record_name(node_name);
        let result = self.storage.write(destination, &name, content);
        if let Err(ref e) = result {
            warn!(destination, record = %name, error = %e, "failed to write key record");
        }
        RecordOutcome { kind, name, result }
    }
}
