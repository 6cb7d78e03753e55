// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the index.
//!
//! A [`Posting`] records every position of one term inside one document, an
//! [`InvertedList`] is the ordered run of postings for one term, and the rest
//! of the types here are the bookkeeping that hangs off the index: per-term
//! statistics, per-document metadata, and collection-wide totals.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting**: `positions` is strictly increasing. `dtf` is *defined* as
//!   `positions.len()`, never stored separately.
//! - **InvertedList**: postings are strictly increasing by `doc_id`; no
//!   document appears twice.
//! - **TermStats**: `df` equals the posting count and `ctf` equals the sum of
//!   `dtf` over the list. The binary location fields are only meaningful once
//!   the list has been written to disk.
//!
//! These are upheld by construction during indexing (tokens arrive in document
//! order, positions in ascending order) and by the decoders on the way back in.

use serde::{Deserialize, Serialize};

// =============================================================================
// POSTINGS
// =============================================================================

/// One term's occurrences within one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: u32,
    /// Token positions of the term in the document, strictly increasing.
    pub positions: Vec<u32>,
}

impl Posting {
    /// A posting with no occurrences. Used by the document-at-a-time driver to
    /// score documents that do not contain a query term.
    pub fn empty(doc_id: u32) -> Self {
        Posting {
            doc_id,
            positions: Vec::new(),
        }
    }

    pub fn with_positions(doc_id: u32, positions: Vec<u32>) -> Self {
        Posting { doc_id, positions }
    }

    /// Document term frequency: how often the term occurs in this document.
    #[inline]
    pub fn dtf(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// All postings for one term, ordered by ascending `doc_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedList {
    postings: Vec<Posting>,
}

impl InvertedList {
    pub fn new() -> Self {
        InvertedList::default()
    }

    /// Record one occurrence of the term at `position` in `doc_id`.
    ///
    /// Builds the tail posting in place when the document matches, otherwise
    /// starts a new posting. Callers must feed occurrences in document order
    /// and ascending position order, which the indexer does by construction.
    pub fn add_posting(&mut self, doc_id: u32, position: u32) {
        match self.postings.last_mut() {
            Some(last) if last.doc_id == doc_id => last.positions.push(position),
            _ => self.postings.push(Posting::with_positions(doc_id, vec![position])),
        }
    }

    /// Append a complete posting. Used by the decoders and by the proximity
    /// nodes when materializing synthetic window lists.
    pub fn add_posting_with_positions(&mut self, doc_id: u32, positions: Vec<u32>) {
        self.postings.push(Posting::with_positions(doc_id, positions));
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Document frequency: the number of postings in the list.
    pub fn df(&self) -> u32 {
        self.postings.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

// =============================================================================
// STATISTICS & METADATA
// =============================================================================

/// Lookup-table entry for one term: collection statistics plus the location of
/// its encoded inverted list in the binary file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    /// Collection term frequency: total occurrences across all documents.
    pub ctf: u64,
    /// Document frequency: number of documents containing the term.
    pub df: u32,
    /// Byte offset of the encoded list in the inverted-lists file.
    #[serde(default)]
    pub posting_list_position: u64,
    /// Encoded length of the list in bytes.
    #[serde(default)]
    pub posting_list_size: u64,
}

/// Metadata for one document (a play scene).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMeta {
    pub play_id: String,
    pub scene_id: String,
    pub scene_num: u32,
    /// Token count of the scene, duplicates included. This is the document
    /// length every retrieval model uses.
    pub scene_length: u32,
}

/// Corpus-wide totals, recomputed once ingestion finishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    /// Sum of `scene_length` over all documents.
    pub total_length: u64,
    pub number_of_docs: u32,
    /// `total_length / number_of_docs`, valid only after finalization.
    pub average_length: f64,
}

/// One ranked retrieval result: the document's metadata with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub doc_id: u32,
    #[serde(flatten)]
    pub meta: DocMeta,
    pub score: f64,
}
