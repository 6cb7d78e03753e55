// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test support: tiny in-memory indexes and cross-index assertions.
//!
//! Used by the unit tests, the integration tests, and the benches. Not part
//! of the crate's public contract.

use std::path::Path;

use crate::config::Config;
use crate::corpus::tokenize;
use crate::index::InvertedIndex;
use crate::types::DocMeta;

/// Build a resident index straight from raw scene texts, bypassing disk.
///
/// Documents get ids in slice order and synthetic play/scene metadata.
pub fn index_from_texts(texts: &[&str]) -> InvertedIndex {
    let config = Config {
        in_memory: true,
        ..Config::default()
    };
    let mut index = InvertedIndex::new(config, false);

    for (doc_id, text) in texts.iter().enumerate() {
        let doc_id = doc_id as u32;
        let terms = tokenize(text);
        index.update_docs_meta(
            doc_id,
            DocMeta {
                play_id: "test_play".to_string(),
                scene_id: format!("test_play:{doc_id}"),
                scene_num: doc_id,
                scene_length: terms.len() as u32,
            },
        );
        index.add_doc_length(terms.len() as u32);
        for (position, term) in terms.iter().enumerate() {
            index.update_map(term, doc_id, position as u32);
        }
    }

    index.finalize_collection_stats();
    index.load_vocabulary();
    index
}

/// Write a corpus JSON file for the given scene texts under `dir`, returning
/// a config rooted there.
pub fn write_corpus(dir: &Path, texts: &[&str]) -> std::io::Result<Config> {
    let scenes: Vec<serde_json::Value> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            serde_json::json!({
                "playId": "test_play",
                "sceneId": format!("test_play:{i}"),
                "sceneNum": i,
                "text": text,
            })
        })
        .collect();
    let corpus = serde_json::json!({ "corpus": scenes });

    let data_dir = dir.join("data");
    std::fs::create_dir_all(&data_dir)?;
    std::fs::write(
        data_dir.join("scenes.json"),
        serde_json::to_string(&corpus)?,
    )?;

    Ok(Config {
        data_file_name: "scenes.json".to_string(),
        data_dir: data_dir.to_string_lossy().into_owned(),
        index_dir: dir.join("index").to_string_lossy().into_owned(),
        ..Config::default()
    })
}

/// Assert that two indexes agree on vocabulary, per-term statistics, document
/// metadata, collection statistics, and the decoded content of every list.
///
/// Byte offsets are allowed to differ; the lists they locate are not.
pub fn assert_indices_equal(a: &InvertedIndex, b: &InvertedIndex) {
    assert_eq!(
        a.get_vocabulary(),
        b.get_vocabulary(),
        "vocabularies differ"
    );
    for term in a.get_vocabulary() {
        assert_eq!(a.get_ctf(term), b.get_ctf(term), "ctf differs for {term:?}");
        assert_eq!(a.get_df(term), b.get_df(term), "df differs for {term:?}");
        assert_eq!(
            a.get_inverted_list(term).unwrap(),
            b.get_inverted_list(term).unwrap(),
            "posting list differs for {term:?}"
        );
    }
    assert_eq!(a.docs_meta(), b.docs_meta(), "docs meta differs");
    assert_eq!(
        a.collection_stats(),
        b.collection_stats(),
        "collection stats differ"
    );
}
