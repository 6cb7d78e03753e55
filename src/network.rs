// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The inference network: structured operators over the query-node tree.
//!
//! This is a thin factory plus a driver. [`InferenceNetwork::get_operator`]
//! splits the query into tokens, wraps each in a term node, and roots them
//! under the requested operator; [`InferenceNetwork::get_documents`] walks
//! the root with the four-operation interface and ranks what it scores.
//!
//! Window operators take their `window_size` here; belief operators combine
//! Dirichlet-smoothed term scores. Filters and weighted combinators have no
//! operator-name spelling — they are built directly through the
//! [`QueryNode`] constructors.

use std::collections::HashMap;
use std::io;

use clap::ValueEnum;

use crate::index::InvertedIndex;
use crate::operators::QueryNode;
use crate::query::rank_results;
use crate::types::SearchResult;

/// Operator names the network knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StructuredOperator {
    OrderedWindow,
    UnorderedWindow,
    BooleanAnd,
    And,
    Or,
    Sum,
    Max,
}

pub struct InferenceNetwork<'a> {
    index: &'a InvertedIndex,
}

impl<'a> InferenceNetwork<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        InferenceNetwork { index }
    }

    /// Build the operator tree for a query. `window_size` only matters for
    /// the window operators.
    pub fn get_operator(
        &self,
        query_string: &str,
        operator: StructuredOperator,
        window_size: u32,
    ) -> io::Result<QueryNode> {
        let terms: Vec<String> = query_string
            .split_whitespace()
            .map(str::to_string)
            .collect();

        match operator {
            StructuredOperator::OrderedWindow => {
                QueryNode::ordered_window(self.index, &terms, window_size)
            }
            StructuredOperator::UnorderedWindow => {
                QueryNode::unordered_window(self.index, &terms, window_size)
            }
            StructuredOperator::BooleanAnd => QueryNode::boolean_and(self.index, &terms),
            StructuredOperator::And => Ok(QueryNode::and(self.term_nodes(&terms)?)),
            StructuredOperator::Or => Ok(QueryNode::or(self.term_nodes(&terms)?)),
            StructuredOperator::Sum => Ok(QueryNode::sum(self.term_nodes(&terms)?)),
            StructuredOperator::Max => Ok(QueryNode::max(self.term_nodes(&terms)?)),
        }
    }

    fn term_nodes(&self, terms: &[String]) -> io::Result<Vec<QueryNode>> {
        terms
            .iter()
            .map(|term| QueryNode::term(self.index, term))
            .collect()
    }

    /// Drain the operator tree and return the top `count` documents.
    ///
    /// Each round takes the current candidate, aligns the whole tree on it,
    /// scores it, and advances past it. Documents scoring exactly zero (a
    /// filter miss) are not recorded.
    pub fn get_documents(&self, operator: &mut QueryNode, count: usize) -> Vec<SearchResult> {
        let mut scores: HashMap<u32, f64> = HashMap::new();

        while operator.has_more() {
            let Some(candidate) = operator.next_candidate() else {
                break;
            };
            let doc_id = candidate.doc_id;
            operator.skip_to(doc_id);
            let score = operator.score(doc_id, self.index);
            if score != 0.0 {
                scores.insert(doc_id, score);
            }
            operator.skip_to(doc_id + 1);
        }

        rank_results(self.index, scores, count)
    }
}
