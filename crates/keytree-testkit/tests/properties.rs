//! Property tests over whole trees and exports.

use std::collections::HashSet;

use proptest::prelude::*;

use keytree::core::topology;
use keytree::keys::{PlaceholderProvider, SeededProvider};
use keytree::store::{MemoryStore, Storage};
use keytree::{build_tree, relabel, KeyExporter, KeyTreeConfig, LabelTable};
use keytree_core::default_label;
use keytree_testkit::fixtures::{CountingProvider, FlakyStore};
use keytree_testkit::generators::{empty_height, height, height_with_unique_labels, label_table};
use keytree_testkit::TestFixture;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn built_trees_have_full_shape(h in height()) {
        let tree = build_tree(h, &PlaceholderProvider::new()).unwrap();
        let h = h as u32;

        prop_assert_eq!(tree.len() as u64, topology::node_count(h));
        prop_assert_eq!(tree.leaves().count() as u64, topology::leaf_count(h));
        prop_assert_eq!(tree.internal_nodes().count() as u64, topology::internal_count(h));
        prop_assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn every_internal_node_has_two_tokens(h in height()) {
        let provider = CountingProvider::new();
        let tree = build_tree(h, &provider).unwrap();

        for node in tree.internal_nodes() {
            prop_assert!(node.left_re_encryption_key().is_some());
            prop_assert!(node.right_re_encryption_key().is_some());
        }
        for node in tree.leaves() {
            prop_assert!(node.left_re_encryption_key().is_none());
            prop_assert!(node.right_re_encryption_key().is_none());
        }
        prop_assert_eq!(provider.key_pairs(), tree.len());
        prop_assert_eq!(provider.tokens(), tree.len() - 1);
    }

    #[test]
    fn x25519_keys_are_distinct(h in 1i64..=4, seed in any::<u64>()) {
        let tree = build_tree(h, &SeededProvider::from_u64(seed)).unwrap();
        let public: HashSet<&[u8]> = tree.nodes().iter().map(|n| n.encryption_key().as_bytes()).collect();
        let secret: HashSet<&[u8]> = tree.nodes().iter().map(|n| n.decryption_key().expose()).collect();

        prop_assert_eq!(public.len(), tree.len());
        prop_assert_eq!(secret.len(), tree.len());
    }

    #[test]
    fn empty_heights_build_nothing(h in empty_height()) {
        let tree = build_tree(h, &PlaceholderProvider::new()).unwrap();
        prop_assert!(tree.is_empty());
        prop_assert!(tree.root().is_none());
        prop_assert_eq!(tree.pre_order().count(), 0);
    }

    #[test]
    fn relabel_only_touches_identifiers(h in height(), table in label_table(200)) {
        let fixture = TestFixture::new();
        let mut tree = fixture.tree(h).unwrap();
        let before: Vec<Vec<u8>> = tree.nodes().iter().map(|n| n.encryption_key().as_bytes().to_vec()).collect();

        let summary = relabel(&mut tree, &table, default_label);

        prop_assert_eq!(summary.relabeled, tree.len());
        for node in tree.nodes() {
            let expected = table
                .get(node.index())
                .map(str::to_owned)
                .unwrap_or_else(|| default_label(node.index()));
            prop_assert_eq!(node.identifier(), expected.as_str());
            prop_assert_eq!(node.encryption_key().as_bytes(), before[node.index().as_usize()].as_slice());
        }
        prop_assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn relabel_is_idempotent(h in height(), table in label_table(64)) {
        let mut tree = build_tree(h, &PlaceholderProvider::new()).unwrap();
        relabel(&mut tree, &table, default_label);
        let once: Vec<String> = tree.nodes().iter().map(|n| n.identifier().to_owned()).collect();
        relabel(&mut tree, &table, default_label);
        let twice: Vec<String> = tree.nodes().iter().map(|n| n.identifier().to_owned()).collect();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unique_labels_export_two_records_per_node((h, table) in height_with_unique_labels()) {
        let mut tree = build_tree(h, &PlaceholderProvider::new()).unwrap();
        relabel(&mut tree, &table, default_label);

        let store = MemoryStore::new();
        let report = KeyExporter::new(&store).export(&tree, "keys").unwrap();

        prop_assert!(report.is_complete());
        prop_assert_eq!(report.records_written(), tree.len() * 2);
        prop_assert_eq!(store.list("keys").unwrap().len(), tree.len() * 2);
    }

    #[test]
    fn pre_order_visits_every_node_once(h in height()) {
        let tree = build_tree(h, &PlaceholderProvider::new()).unwrap();
        let seen: HashSet<u64> = tree.pre_order().map(|e| e.index.get()).collect();

        prop_assert_eq!(seen.len(), tree.len());
        prop_assert_eq!(tree.edges().len(), tree.len() - 1);
    }
}

#[test]
fn test_record_failures_are_aggregated() {
    let fixture = TestFixture::new();
    let mut tree = fixture.tree(3).unwrap();
    relabel(&mut tree, &LabelTable::diagram(), default_label);

    let store = FlakyStore::failing(["13_private", "5_public", "5_private"]);
    let report = KeyExporter::new(&store).export(&tree, "keys").unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.records_written(), 27);

    let failed: Vec<&str> = report
        .failures()
        .into_iter()
        .map(|(_, r)| r.name.as_str())
        .collect();
    assert_eq!(failed, ["13_private", "5_public", "5_private"]);

    // Later nodes were still written.
    assert!(store.read("keys", "8_private").unwrap().is_some());
    assert!(store.read("keys", "13_public").unwrap().is_some());
}

#[test]
fn test_pipeline_over_flaky_store() {
    let fixture = TestFixture::new();
    let store = FlakyStore::failing(["0_public"]);
    let outcome = keytree::Pipeline::new(&fixture.provider, &store, KeyTreeConfig::default())
        .run()
        .unwrap();

    let failures = outcome.export.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.identifier, "0");
    assert_eq!(store.inner().write_count(), 29);
}

#[test]
fn test_fixture_pipeline() {
    let fixture = TestFixture::with_seed([7; 32]);
    let outcome = fixture.pipeline(KeyTreeConfig::default()).run().unwrap();

    assert_eq!(fixture.store.list("node_keys").unwrap().len(), 30);
    assert_eq!(outcome.tree.find_by_identifier("14").map(|n| n.index().get()), Some(2));
}
