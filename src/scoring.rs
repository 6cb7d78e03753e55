// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind ranked retrieval.
//!
//! Four scoring models, all computed per `(query term, posting)` pair; the
//! retrieval drivers do the summation over terms. All arithmetic is `f64` and
//! the language models work in log space.
//!
//! With `f_i` the term's frequency in the document, `qf_i` its frequency in
//! the query, `n_i` its document frequency, `N` the document count, `dl` and
//! `avdl` the document and average lengths, `c_qi` the collection term
//! frequency, and `cl` the collection length:
//!
//! | Model            | Score                                                                  |
//! |------------------|------------------------------------------------------------------------|
//! | `raw_counts`     | `f_i · qf_i`                                                           |
//! | `bm25`           | `ln((N−n_i+0.5)/(n_i+0.5)) · (k1+1)f_i/(K+f_i) · (k2+1)qf_i/(k2+qf_i)` |
//! | `jelinek_mercer` | `qf_i · ln((1−α_D)(f_i/dl) + α_D(c_qi/cl))`                            |
//! | `dirichlet`      | `qf_i · ln((f_i + μ·c_qi/cl)/(dl + μ))`                                |
//!
//! where `K = k1·((1−b) + b·dl/avdl)`. BM25 is the no-relevance-information
//! form (`R = r_i = 0`). When a term is absent from a document the smoothed
//! models still produce a finite score through the collection term; BM25's
//! `f_i`-dependent factor makes the whole product zero.
//!
//! Callers must drop query terms that are not in the vocabulary before
//! scoring: `c_qi = 0` would put a zero inside the logarithms.
//!
//! # References
//!
//! - Croft, Metzler, Strohman (2009): "Search Engines: Information Retrieval
//!   in Practice", §7.2 (BM25) and §7.3 (query likelihood smoothing).
//! - Zhai & Lafferty (2001): "A Study of Smoothing Methods for Language
//!   Models Applied to Ad Hoc Information Retrieval", SIGIR.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::index::InvertedIndex;
use crate::types::Posting;

/// Smoothing parameter the inference-network nodes score with.
pub const NETWORK_MU: f64 = 1500.0;

/// Which scoring function the flat query driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalModel {
    RawCounts,
    Bm25,
    JelinekMercer,
    #[default]
    Dirichlet,
}

/// Free parameters of the scoring models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// BM25 term-frequency saturation.
    pub k1: f64,
    /// BM25 query-frequency saturation.
    pub k2: f64,
    /// BM25 length normalization strength.
    pub b: f64,
    /// Jelinek-Mercer collection interpolation weight.
    pub alpha_d: f64,
    /// Dirichlet pseudo-count mass.
    pub mu: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        ScoringParams {
            k1: 1.2,
            k2: 100.0,
            b: 0.75,
            alpha_d: 0.1,
            mu: 1500.0,
        }
    }
}

/// A scoring context: the query, the index statistics, and the chosen model.
pub struct RetrievalModels<'a> {
    query_terms: &'a [String],
    index: &'a InvertedIndex,
    model: RetrievalModel,
    params: ScoringParams,
}

impl<'a> RetrievalModels<'a> {
    pub fn new(
        query_terms: &'a [String],
        index: &'a InvertedIndex,
        model: RetrievalModel,
        params: ScoringParams,
    ) -> Self {
        RetrievalModels {
            query_terms,
            index,
            model,
            params,
        }
    }

    /// Score one posting for one query term under the configured model.
    pub fn get_score(&self, query_term: &str, doc: &Posting) -> f64 {
        match self.model {
            RetrievalModel::RawCounts => self.raw_counts(query_term, doc),
            RetrievalModel::Bm25 => self.bm25(query_term, doc),
            RetrievalModel::JelinekMercer => self.jelinek_mercer(query_term, doc),
            RetrievalModel::Dirichlet => self.dirichlet(query_term, doc),
        }
    }

    /// How often the term occurs in the query (duplicates count).
    fn query_frequency(&self, query_term: &str) -> f64 {
        self.query_terms.iter().filter(|t| *t == query_term).count() as f64
    }

    fn raw_counts(&self, query_term: &str, doc: &Posting) -> f64 {
        f64::from(doc.dtf()) * self.query_frequency(query_term)
    }

    fn bm25(&self, query_term: &str, doc: &Posting) -> f64 {
        let fi = f64::from(doc.dtf());
        let qfi = self.query_frequency(query_term);
        let ni = self.index.get_df(query_term) as f64;
        let n = f64::from(self.index.get_total_docs());
        let dl = f64::from(self.index.get_doc_length(doc.doc_id));
        let avdl = self.index.get_average_doc_length();
        let k1 = self.params.k1;
        let k2 = self.params.k2;
        let k = k1 * ((1.0 - self.params.b) + self.params.b * (dl / avdl));

        ((n - ni + 0.5) / (ni + 0.5)).ln()
            * ((k1 + 1.0) * fi / (k + fi))
            * ((k2 + 1.0) * qfi / (k2 + qfi))
    }

    fn jelinek_mercer(&self, query_term: &str, doc: &Posting) -> f64 {
        let fqi_d = f64::from(doc.dtf());
        let dl = f64::from(self.index.get_doc_length(doc.doc_id));
        let cqi = self.index.get_ctf(query_term) as f64;
        let cl = self.index.get_collection_length() as f64;
        let alpha_d = self.params.alpha_d;

        let score = ((1.0 - alpha_d) * (fqi_d / dl) + alpha_d * (cqi / cl)).ln();
        score * self.query_frequency(query_term)
    }

    fn dirichlet(&self, query_term: &str, doc: &Posting) -> f64 {
        let fqi_d = f64::from(doc.dtf());
        let dl = f64::from(self.index.get_doc_length(doc.doc_id));
        let cqi = self.index.get_ctf(query_term) as f64;
        let cl = self.index.get_collection_length() as f64;
        let mu = self.params.mu;

        let score = ((fqi_d + mu * (cqi / cl)) / (dl + mu)).ln();
        score * self.query_frequency(query_term)
    }
}

/// Dirichlet-smoothed log likelihood with explicit statistics.
///
/// Shared by the query-node tree, where the "term" may be a synthetic window
/// with its own aggregated collection frequency.
pub fn dirichlet_score(dtf: f64, doc_length: f64, ctf: f64, collection_length: f64, mu: f64) -> f64 {
    ((dtf + mu * (ctf / collection_length)) / (doc_length + mu)).ln()
}
