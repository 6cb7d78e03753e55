// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The flat query driver: bag-of-words scoring over one retrieval model.
//!
//! Two traversal strategies produce the same ranking with different work
//! patterns:
//!
//! - **Term-at-a-time** walks each query term's posting list once and
//!   accumulates partial scores per document. Only documents containing at
//!   least one query term ever get a score, so for the smoothed language
//!   models the missing-term background mass is simply not added — that is
//!   the documented contract, not an accident.
//! - **Document-at-a-time** visits every doc_id in `[0, N)` and asks each
//!   query term for its posting, substituting a zero-frequency posting when
//!   the term is absent. Smoothed models therefore score the full background
//!   for every document. One advancing pointer per list keeps this linear in
//!   the posting data.
//!
//! Unknown terms are dropped before scoring, and results are sorted by
//! `(score, doc_id)` descending — on a tie the larger doc_id wins.

use std::collections::HashMap;
use std::io;

use crate::index::InvertedIndex;
use crate::scoring::{RetrievalModel, RetrievalModels, ScoringParams};
use crate::types::{Posting, SearchResult};

use clap::ValueEnum;

/// Which traversal the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueryMode {
    /// Term-at-a-time accumulation.
    #[default]
    Term,
    /// Document-at-a-time with an external loop over all doc_ids.
    Doc,
}

pub struct Query<'a> {
    index: &'a InvertedIndex,
    mode: QueryMode,
    model: RetrievalModel,
    count: usize,
    params: ScoringParams,
}

impl<'a> Query<'a> {
    pub fn new(
        index: &'a InvertedIndex,
        mode: QueryMode,
        model: RetrievalModel,
        count: usize,
        params: ScoringParams,
    ) -> Self {
        Query {
            index,
            mode,
            model,
            count,
            params,
        }
    }

    /// Run the query and return the top-K documents with metadata attached.
    /// An empty query — or one with no known terms — returns an empty list.
    pub fn get_documents(&self, query_string: &str) -> io::Result<Vec<SearchResult>> {
        let query_terms: Vec<String> = query_string
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let scores = match self.mode {
            QueryMode::Term => self.term_at_a_time(&query_terms)?,
            QueryMode::Doc => self.document_at_a_time(&query_terms)?,
        };
        Ok(rank_results(self.index, scores, self.count))
    }

    /// Each unique known term contributes to every document on its posting
    /// list; duplicates in the query show up through `qf_i` instead of a
    /// second walk.
    fn term_at_a_time(&self, query_terms: &[String]) -> io::Result<HashMap<u32, f64>> {
        let models = RetrievalModels::new(query_terms, self.index, self.model, self.params);
        let mut scores: HashMap<u32, f64> = HashMap::new();

        for term in unique_known_terms(self.index, query_terms) {
            let inverted_list = self.index.get_inverted_list(term)?;
            for posting in inverted_list.postings() {
                *scores.entry(posting.doc_id).or_insert(0.0) += models.get_score(term, posting);
            }
        }
        Ok(scores)
    }

    /// External loop over all doc_ids; absent terms score through a
    /// zero-frequency posting. Documents whose total comes out exactly zero
    /// are not recorded.
    fn document_at_a_time(&self, query_terms: &[String]) -> io::Result<HashMap<u32, f64>> {
        let models = RetrievalModels::new(query_terms, self.index, self.model, self.params);

        let mut lists = Vec::new();
        for term in unique_known_terms(self.index, query_terms) {
            lists.push((term, self.index.get_inverted_list(term)?));
        }
        let mut cursors = vec![0usize; lists.len()];

        let mut scores: HashMap<u32, f64> = HashMap::new();
        for doc_id in 0..self.index.get_total_docs() {
            let mut total = 0.0;
            for (i, (term, list)) in lists.iter().enumerate() {
                let postings = list.postings();
                while cursors[i] < postings.len() && postings[cursors[i]].doc_id < doc_id {
                    cursors[i] += 1;
                }
                match postings.get(cursors[i]) {
                    Some(posting) if posting.doc_id == doc_id => {
                        total += models.get_score(term, posting);
                    }
                    _ => {
                        total += models.get_score(term, &Posting::empty(doc_id));
                    }
                }
            }
            if total != 0.0 {
                scores.insert(doc_id, total);
            }
        }
        Ok(scores)
    }
}

/// Query terms in first-appearance order, unknown terms dropped.
fn unique_known_terms<'q>(index: &InvertedIndex, query_terms: &'q [String]) -> Vec<&'q String> {
    let mut seen: Vec<&String> = Vec::new();
    for term in query_terms {
        if index.has_term(term) && !seen.contains(&term) {
            seen.push(term);
        }
    }
    seen
}

/// Sort `(doc_id, score)` pairs by `(score, doc_id)` descending, keep the top
/// `count`, and attach document metadata.
pub(crate) fn rank_results(
    index: &InvertedIndex,
    scores: HashMap<u32, f64>,
    count: usize,
) -> Vec<SearchResult> {
    let mut ranked: Vec<(u32, f64)> = scores.into_iter().collect();
    ranked.sort_unstable_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.0.cmp(&a.0))
    });
    ranked.truncate(count);

    ranked
        .into_iter()
        .map(|(doc_id, score)| SearchResult {
            doc_id,
            meta: index.get_doc_meta(doc_id).clone(),
            score,
        })
        .collect()
}
