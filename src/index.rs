// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The inverted index facade.
//!
//! [`InvertedIndex`] owns every piece of index state: the term → posting-list
//! map (while resident), the lookup table, per-document metadata, collection
//! statistics, and the sorted vocabulary. It is built exactly once per corpus
//! — either streamed out of the tokenizer or rehydrated from the artifacts on
//! disk — and is logically immutable for the whole query phase.
//!
//! The one interesting decision is what `get_inverted_list` does when the
//! index is not resident (`in_memory = false`): it opens the inverted-lists
//! file, seeks to the term's `posting_list_position`, reads exactly
//! `posting_list_size` bytes, and decodes them bounded by the term's `df`.
//! Opening per call keeps the facade stateless; a cached read-only handle
//! would also satisfy the single-writer/many-reader contract if this ever
//! shows up in a profile.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::binary::bytes_to_postings;
use crate::config::Config;
use crate::types::{CollectionStats, DocMeta, InvertedList, TermStats};

pub struct InvertedIndex {
    config: Config,
    /// Which binary framing this index reads and writes.
    compressed: bool,
    /// Term -> posting list. Populated during build and for `in_memory`
    /// indexes; dropped after persistence otherwise.
    map: HashMap<String, InvertedList>,
    collection_stats: CollectionStats,
    /// Keyed by doc_id; serializes as a JSON object with stringified keys.
    docs_meta: BTreeMap<u32, DocMeta>,
    lookup_table: HashMap<String, TermStats>,
    /// Sorted ascending; derived from the lookup table, never persisted.
    vocabulary: Vec<String>,
}

impl InvertedIndex {
    pub fn new(config: Config, compressed: bool) -> Self {
        InvertedIndex {
            config,
            compressed,
            map: HashMap::new(),
            collection_stats: CollectionStats::default(),
            docs_meta: BTreeMap::new(),
            lookup_table: HashMap::new(),
            vocabulary: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    // ========================================================================
    // COLLECTION STATISTICS
    // ========================================================================

    pub fn collection_stats(&self) -> &CollectionStats {
        &self.collection_stats
    }

    pub fn load_collection_stats(&mut self, stats: CollectionStats) {
        self.collection_stats = stats;
    }

    /// Account for one ingested document of `doc_length` tokens.
    pub fn add_doc_length(&mut self, doc_length: u32) {
        self.collection_stats.total_length += u64::from(doc_length);
        self.collection_stats.number_of_docs += 1;
    }

    /// Recompute the average document length. Must run after the last
    /// document has been ingested and before the index is used for scoring.
    pub fn finalize_collection_stats(&mut self) {
        if self.collection_stats.number_of_docs > 0 {
            self.collection_stats.average_length = self.collection_stats.total_length as f64
                / f64::from(self.collection_stats.number_of_docs);
        }
    }

    pub fn get_collection_length(&self) -> u64 {
        self.collection_stats.total_length
    }

    pub fn get_total_docs(&self) -> u32 {
        self.collection_stats.number_of_docs
    }

    pub fn get_average_doc_length(&self) -> f64 {
        self.collection_stats.average_length
    }

    // ========================================================================
    // DOCUMENT METADATA
    // ========================================================================

    pub fn docs_meta(&self) -> &BTreeMap<u32, DocMeta> {
        &self.docs_meta
    }

    pub fn load_docs_meta(&mut self, docs_meta: BTreeMap<u32, DocMeta>) {
        self.docs_meta = docs_meta;
    }

    pub fn update_docs_meta(&mut self, doc_id: u32, meta: DocMeta) {
        self.docs_meta.insert(doc_id, meta);
    }

    /// Panics if `doc_id` was never indexed; that is a caller bug, not a
    /// recoverable condition.
    pub fn get_doc_meta(&self, doc_id: u32) -> &DocMeta {
        self.docs_meta
            .get(&doc_id)
            .unwrap_or_else(|| panic!("doc_id {doc_id} out of range for this index"))
    }

    pub fn get_doc_length(&self, doc_id: u32) -> u32 {
        self.get_doc_meta(doc_id).scene_length
    }

    // ========================================================================
    // LOOKUP TABLE & VOCABULARY
    // ========================================================================

    pub fn lookup_table(&self) -> &HashMap<String, TermStats> {
        &self.lookup_table
    }

    pub fn load_lookup_table(&mut self, lookup_table: HashMap<String, TermStats>) {
        self.lookup_table = lookup_table;
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.lookup_table.contains_key(term)
    }

    pub fn term_stats(&self, term: &str) -> Option<&TermStats> {
        self.lookup_table.get(term)
    }

    /// Collection term frequency; 0 for unknown terms. Retrieval drivers drop
    /// unknown terms before scoring, so a zero never reaches a logarithm.
    pub fn get_ctf(&self, term: &str) -> u64 {
        self.lookup_table.get(term).map_or(0, |s| s.ctf)
    }

    /// Document frequency; 0 for unknown terms.
    pub fn get_df(&self, term: &str) -> u32 {
        self.lookup_table.get(term).map_or(0, |s| s.df)
    }

    /// Record where a term's encoded list landed in the binary file. Called by
    /// the persister once the bytes are written.
    pub fn set_list_location(&mut self, term: &str, position: u64, size: u64) {
        let stats = self
            .lookup_table
            .get_mut(term)
            .unwrap_or_else(|| panic!("term {term:?} missing from lookup table"));
        stats.posting_list_position = position;
        stats.posting_list_size = size;
    }

    /// Rebuild the sorted vocabulary from the lookup table.
    pub fn load_vocabulary(&mut self) {
        let mut vocabulary: Vec<String> = self.lookup_table.keys().cloned().collect();
        vocabulary.sort_unstable();
        self.vocabulary = vocabulary;
    }

    pub fn get_vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    // ========================================================================
    // POSTING LISTS
    // ========================================================================

    /// Record one `(term, doc_id, position)` occurrence during the build.
    ///
    /// Extends or creates the term's posting list, then keeps the lookup
    /// table in step: `ctf` counts every call, `df` tracks the posting count.
    pub fn update_map(&mut self, term: &str, doc_id: u32, position: u32) {
        let list = self.map.entry(term.to_string()).or_default();
        list.add_posting(doc_id, position);
        let df = list.df();

        let stats = self.lookup_table.entry(term.to_string()).or_default();
        stats.ctf += 1;
        stats.df = df;
    }

    pub fn map(&self) -> &HashMap<String, InvertedList> {
        &self.map
    }

    pub fn load_map(&mut self, map: HashMap<String, InvertedList>) {
        self.map = map;
    }

    /// Drop the resident posting lists; later lookups go to disk.
    pub fn delete_map(&mut self) {
        self.map = HashMap::new();
    }

    /// Fetch the posting list for a term.
    ///
    /// Unknown terms yield an empty list. Resident indexes answer from the
    /// map; otherwise this is the seek-read-decode hot path described in the
    /// module docs. A list that does not decode cleanly against the lookup
    /// table's `df` and size is corruption and surfaces as an error.
    pub fn get_inverted_list(&self, term: &str) -> io::Result<InvertedList> {
        if self.config.in_memory {
            return Ok(self.map.get(term).cloned().unwrap_or_default());
        }
        match self.lookup_table.get(term) {
            Some(stats) => self.read_list_from_disk(stats),
            None => Ok(InvertedList::new()),
        }
    }

    fn read_list_from_disk(&self, stats: &TermStats) -> io::Result<InvertedList> {
        let path = self.config.inverted_lists_path(self.compressed);
        let mut file = File::open(&path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Failed to open inverted lists {}: {}", path.display(), e),
            )
        })?;
        file.seek(SeekFrom::Start(stats.posting_list_position))?;
        let mut buf = vec![0u8; stats.posting_list_size as usize];
        file.read_exact(&mut buf)?;
        bytes_to_postings(&buf, self.compressed, stats.df)
    }

    /// Read one term's list from an already-open inverted-lists file. Used by
    /// the loader when pulling a whole index into memory.
    pub(crate) fn read_list_from(
        file: &mut File,
        stats: &TermStats,
        compressed: bool,
    ) -> io::Result<InvertedList> {
        file.seek(SeekFrom::Start(stats.posting_list_position))?;
        let mut buf = vec![0u8; stats.posting_list_size as usize];
        file.read_exact(&mut buf)?;
        bytes_to_postings(&buf, compressed, stats.df)
    }

    /// Structural invariant check used by tests: doc_ids strictly increasing,
    /// positions strictly increasing, and the lookup table in agreement with
    /// the resident lists.
    #[cfg(any(test, debug_assertions))]
    pub fn check_well_formed(&self) -> bool {
        for (term, list) in &self.map {
            let Some(stats) = self.lookup_table.get(term) else {
                return false;
            };
            if stats.df != list.df() {
                return false;
            }
            let dtf_sum: u64 = list.postings().iter().map(|p| u64::from(p.dtf())).sum();
            if stats.ctf != dtf_sum {
                return false;
            }
            let mut prev_doc: Option<u32> = None;
            for posting in list.postings() {
                if prev_doc.is_some_and(|prev| prev >= posting.doc_id) {
                    return false;
                }
                prev_doc = Some(posting.doc_id);
                if posting.positions.windows(2).any(|w| w[0] >= w[1]) {
                    return false;
                }
            }
        }
        let total: u64 = self.docs_meta.values().map(|m| u64::from(m.scene_length)).sum();
        total == self.collection_stats.total_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::index_from_texts;

    #[test]
    fn build_produces_the_expected_statistics() {
        // Two tiny scenes: "a b a" and "a c".
        let index = index_from_texts(&["a b a", "a c"]);

        assert_eq!(index.get_df("a"), 2);
        assert_eq!(index.get_ctf("a"), 3);
        assert_eq!(index.get_df("b"), 1);
        assert_eq!(index.get_ctf("b"), 1);
        assert_eq!(index.get_df("c"), 1);
        assert_eq!(index.get_ctf("c"), 1);

        assert_eq!(index.get_doc_length(0), 3);
        assert_eq!(index.get_doc_length(1), 2);
        assert_eq!(index.get_total_docs(), 2);
        assert_eq!(index.get_collection_length(), 5);
        assert!((index.get_average_doc_length() - 2.5).abs() < f64::EPSILON);

        let a = index.get_inverted_list("a").unwrap();
        assert_eq!(a.postings()[0].doc_id, 0);
        assert_eq!(a.postings()[0].positions, vec![0, 2]);
        assert_eq!(a.postings()[1].doc_id, 1);
        assert_eq!(a.postings()[1].positions, vec![0]);

        assert!(index.check_well_formed());
    }

    #[test]
    fn vocabulary_is_sorted_and_complete() {
        let index = index_from_texts(&["the quick brown fox", "the lazy dog"]);
        let vocab = index.get_vocabulary();
        assert_eq!(vocab.len(), index.lookup_table().len());
        assert!(vocab.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unknown_term_has_empty_list_and_zero_stats() {
        let index = index_from_texts(&["a b"]);
        assert!(!index.has_term("z"));
        assert_eq!(index.get_ctf("z"), 0);
        assert_eq!(index.get_df("z"), 0);
        assert!(index.get_inverted_list("z").unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_doc_meta_lookup_panics() {
        let index = index_from_texts(&["a b"]);
        index.get_doc_meta(99);
    }
}
