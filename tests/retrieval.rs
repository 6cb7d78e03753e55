// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end retrieval over a persisted index: the full corpus → artifacts →
//! query pipeline, exercised through both drivers and the inference network.

use prosody::build::Indexer;
use prosody::network::{InferenceNetwork, StructuredOperator};
use prosody::query::{Query, QueryMode};
use prosody::scoring::{RetrievalModel, ScoringParams};
use prosody::testing::write_corpus;
use prosody::InvertedIndex;

fn persisted_index(dir: &tempfile::TempDir, scenes: &[&str], compressed: bool) -> InvertedIndex {
    let mut config = write_corpus(dir.path(), scenes).unwrap();
    config.compressed = compressed;
    config.in_memory = false;
    Indexer::new(config).get_inverted_index().unwrap()
}

fn search(
    index: &InvertedIndex,
    query: &str,
    model: RetrievalModel,
    mode: QueryMode,
) -> Vec<(u32, f64)> {
    Query::new(index, mode, model, 10, ScoringParams::default())
        .get_documents(query)
        .unwrap()
        .into_iter()
        .map(|r| (r.doc_id, r.score))
        .collect()
}

#[test]
fn raw_counts_scenario_over_a_persisted_index() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(&dir, &["a b a", "a c"], true);

    assert_eq!(
        search(&index, "a", RetrievalModel::RawCounts, QueryMode::Term),
        vec![(0, 2.0), (1, 1.0)]
    );
}

#[test]
fn statistics_survive_the_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(&dir, &["a b a", "a c"], true);

    assert_eq!(index.get_df("a"), 2);
    assert_eq!(index.get_ctf("a"), 3);
    assert_eq!(index.get_doc_length(0), 3);
    assert_eq!(index.get_doc_length(1), 2);
    assert!((index.get_average_doc_length() - 2.5).abs() < f64::EPSILON);

    let a = index.get_inverted_list("a").unwrap();
    assert_eq!(a.postings()[0].positions, vec![0, 2]);
    assert_eq!(a.postings()[1].positions, vec![0]);
}

#[test]
fn all_four_models_rank_a_persisted_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(
        &dir,
        &[
            "the king speaks to the queen",
            "the queen is silent",
            "a king a king my kingdom",
            "nothing relevant here at all",
        ],
        true,
    );

    for model in [
        RetrievalModel::RawCounts,
        RetrievalModel::Bm25,
        RetrievalModel::JelinekMercer,
        RetrievalModel::Dirichlet,
    ] {
        let results = search(&index, "king queen", model, QueryMode::Term);
        assert!(!results.is_empty(), "{model:?} returned nothing");
        assert!(
            results.iter().all(|(_, s)| s.is_finite()),
            "{model:?} produced a non-finite score"
        );
        // Doc 0 contains both terms; it must beat the no-term doc 3 wherever
        // doc 3 appears at all.
        let pos0 = results.iter().position(|(d, _)| *d == 0).unwrap();
        if let Some(pos3) = results.iter().position(|(d, _)| *d == 3) {
            assert!(pos0 < pos3, "{model:?} ranked an irrelevant doc first");
        }
    }
}

#[test]
fn term_and_doc_drivers_agree_for_raw_counts() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(
        &dir,
        &["x y x", "y z", "x x x y", "w w w"],
        false,
    );

    let term = search(&index, "x y", RetrievalModel::RawCounts, QueryMode::Term);
    let doc = search(&index, "x y", RetrievalModel::RawCounts, QueryMode::Doc);
    assert_eq!(term, doc);
}

#[test]
fn structured_operators_run_over_a_persisted_index() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(
        &dir,
        &[
            "of the king",
            "the king of france",
            "king of nothing",
            "the the the",
        ],
        true,
    );
    let network = InferenceNetwork::new(&index);

    // Ordered window "of the" with gap 1: only doc 0 has them adjacent in
    // that order.
    let mut ordered = network
        .get_operator("of the", StructuredOperator::OrderedWindow, 1)
        .unwrap();
    let docs: Vec<u32> = network
        .get_documents(&mut ordered, 10)
        .into_iter()
        .map(|r| r.doc_id)
        .collect();
    assert_eq!(docs, vec![0]);

    // BooleanAnd finds every scene containing all terms regardless of
    // distance.
    let mut boolean = network
        .get_operator("of the", StructuredOperator::BooleanAnd, 0)
        .unwrap();
    let mut docs: Vec<u32> = network
        .get_documents(&mut boolean, 10)
        .into_iter()
        .map(|r| r.doc_id)
        .collect();
    docs.sort_unstable();
    assert_eq!(docs, vec![0, 1]);

    // Belief SUM scores the union of the term lists.
    let mut sum = network
        .get_operator("of the", StructuredOperator::Sum, 0)
        .unwrap();
    assert_eq!(network.get_documents(&mut sum, 10).len(), 4);
}

#[test]
fn duplicate_term_phrase_finds_its_window_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(
        &dir,
        &["to be or not to be", "to be is the question", "not here"],
        true,
    );
    let network = InferenceNetwork::new(&index);

    let mut root = network
        .get_operator(
            "to be or not to be",
            StructuredOperator::UnorderedWindow,
            6,
        )
        .unwrap();
    let results = network.get_documents(&mut root, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, 0);
}

#[test]
fn results_attach_scene_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let index = persisted_index(&dir, &["alpha beta", "gamma"], true);
    let results = Query::new(
        &index,
        QueryMode::Term,
        RetrievalModel::RawCounts,
        10,
        ScoringParams::default(),
    )
    .get_documents("alpha")
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].meta.play_id, "test_play");
    assert_eq!(results[0].meta.scene_id, "test_play:0");
    assert_eq!(results[0].meta.scene_length, 2);
}
