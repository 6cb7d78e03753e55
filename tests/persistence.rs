// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Persistence round trips: build → persist → load must reproduce the index.
//!
//! Offsets inside the binary file are allowed to differ between runs; the
//! lists they locate are not. Everything else — vocabulary, lookup table
//! statistics, document metadata, collection stats — must come back
//! bit-equal.

use prosody::build::Indexer;
use prosody::config::Config;
use prosody::testing::{assert_indices_equal, write_corpus};

const SCENES: &[&str] = &[
    "the king is dead long live the king",
    "a horse a horse my kingdom for a horse",
    "now is the winter of our discontent",
    "to be or not to be that is the question",
    "once more unto the breach dear friends",
];

fn corpus_config(dir: &tempfile::TempDir, compressed: bool, in_memory: bool) -> Config {
    let mut config = write_corpus(dir.path(), SCENES).unwrap();
    config.compressed = compressed;
    config.in_memory = in_memory;
    config
}

#[test]
fn build_persist_load_round_trips_uncompressed() {
    let dir = tempfile::tempdir().unwrap();
    let indexer = Indexer::new(corpus_config(&dir, false, true));

    let mut built = indexer.build().unwrap();
    indexer.persist(&mut built).unwrap();
    let loaded = indexer.load().unwrap();

    assert_indices_equal(&built, &loaded);
}

#[test]
fn build_persist_load_round_trips_compressed() {
    let dir = tempfile::tempdir().unwrap();
    let indexer = Indexer::new(corpus_config(&dir, true, true));

    let mut built = indexer.build().unwrap();
    indexer.persist(&mut built).unwrap();
    let loaded = indexer.load().unwrap();

    assert_indices_equal(&built, &loaded);
}

#[test]
fn compressed_and_uncompressed_indexes_agree() {
    let dir = tempfile::tempdir().unwrap();

    let compressed_indexer = Indexer::new(corpus_config(&dir, true, true));
    let mut compressed = compressed_indexer.build().unwrap();
    compressed_indexer.persist(&mut compressed).unwrap();

    let uncompressed_indexer = Indexer::new(corpus_config(&dir, false, true));
    let mut uncompressed = uncompressed_indexer.build().unwrap();
    uncompressed_indexer.persist(&mut uncompressed).unwrap();

    let compressed = compressed_indexer.load().unwrap();
    let uncompressed = uncompressed_indexer.load().unwrap();
    assert_indices_equal(&compressed, &uncompressed);
}

#[test]
fn on_disk_lookups_match_the_resident_index() {
    let dir = tempfile::tempdir().unwrap();

    // Persist once, then read term by term with in_memory off.
    let resident_indexer = Indexer::new(corpus_config(&dir, true, true));
    let mut resident = resident_indexer.build().unwrap();
    resident_indexer.persist(&mut resident).unwrap();

    let disk_indexer = Indexer::new(corpus_config(&dir, true, false));
    let disk = disk_indexer.load().unwrap();

    for term in resident.get_vocabulary() {
        assert_eq!(
            resident.get_inverted_list(term).unwrap(),
            disk.get_inverted_list(term).unwrap(),
            "disk lookup differs for {term:?}"
        );
    }
}

#[test]
fn missing_artifacts_trigger_a_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let config = corpus_config(&dir, true, true);
    let indexer = Indexer::new(config.clone());

    // First call builds and persists.
    let first = indexer.get_inverted_index().unwrap();
    assert_eq!(first.get_total_docs(), SCENES.len() as u32);

    // Losing the lookup table forces the rebuild path, which restores it.
    std::fs::remove_file(config.lookup_table_path(true)).unwrap();
    let rebuilt = indexer.get_inverted_index().unwrap();
    assert_indices_equal(&first, &rebuilt);
    assert!(config.lookup_table_path(true).is_file());
}

#[test]
fn fresh_build_with_in_memory_off_drops_the_posting_map() {
    let dir = tempfile::tempdir().unwrap();
    let indexer = Indexer::new(corpus_config(&dir, true, false));

    let index = indexer.get_inverted_index().unwrap();
    assert!(index.map().is_empty(), "posting map should be dropped");

    // Queries still work by hitting the binary file.
    let list = index.get_inverted_list("king").unwrap();
    assert_eq!(list.df(), 1);
    assert_eq!(list.postings()[0].positions, vec![1, 7]);
}

#[test]
fn lookup_table_artifact_uses_the_documented_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = corpus_config(&dir, true, true);
    let indexer = Indexer::new(config.clone());
    let mut index = indexer.build().unwrap();
    indexer.persist(&mut index).unwrap();

    let raw = std::fs::read_to_string(config.lookup_table_path(true)).unwrap();
    let table: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &table["king"];
    assert!(entry["ctf"].is_u64());
    assert!(entry["df"].is_u64());
    assert!(entry["posting_list_position"].is_u64());
    assert!(entry["posting_list_size"].is_u64());
}

#[test]
fn docs_meta_artifact_keys_are_stringified_doc_ids() {
    let dir = tempfile::tempdir().unwrap();
    let config = corpus_config(&dir, true, true);
    let indexer = Indexer::new(config.clone());
    let mut index = indexer.build().unwrap();
    indexer.persist(&mut index).unwrap();

    let raw = std::fs::read_to_string(config.docs_meta_path()).unwrap();
    let meta: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(meta.get("0").is_some());
    assert!(meta.get("4").is_some());
    assert_eq!(meta["3"]["sceneLength"], 10);
}

#[test]
fn corrupt_binary_list_surfaces_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = corpus_config(&dir, true, false);
    let indexer = Indexer::new(config.clone());
    let mut index = indexer.build().unwrap();
    indexer.persist(&mut index).unwrap();

    // Truncate the binary file so every offset past the cut is garbage.
    let path = config.inverted_lists_path(true);
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let disk = indexer.load().unwrap();
    let failures = disk
        .get_vocabulary()
        .iter()
        .filter(|term| disk.get_inverted_list(term).is_err())
        .count();
    assert!(failures > 0, "truncation must surface as decode errors");
}
