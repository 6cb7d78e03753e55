// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The structured query tree.
//!
//! Every node — a raw term, a proximity window, a belief combinator, a filter
//! — answers the same four questions about a stream of documents:
//!
//! - `has_more`: is there another candidate document?
//! - `next_candidate`: the current posting, if any.
//! - `skip_to(d)`: discard everything before doc `d`.
//! - `score(d)`: this node's log-probability contribution for doc `d`.
//!
//! Rather than a class hierarchy, [`QueryNode`] is a sum type: leaves carry a
//! posting cursor, belief nodes carry children and weights, filters carry a
//! scoring child and a predicate child. Trees are acyclic and built bottom-up,
//! so plain ownership works out.
//!
//! Proximity nodes do their real work at construction: the term cursors are
//! run through the window extractor once, producing a synthetic inverted list
//! of `(doc_id, window starts)` whose aggregated count plays the role of a
//! collection term frequency. After that a window node is indistinguishable
//! from a term node, which is why both are the single [`QueryNode::Postings`]
//! variant.
//!
//! Scores are Dirichlet-smoothed log likelihoods (`μ = 1500`) for leaves, and
//! the usual inference-network combinators above them: AND sums weighted
//! child scores, OR and NOT go through `ln(1 − e^x)`, SUM averages
//! probabilities, MAX takes the best child.

mod windows;

use std::io;

pub use windows::{ordered_window_starts, unordered_window_starts};

use crate::index::InvertedIndex;
use crate::scoring::{dirichlet_score, NETWORK_MU};
use crate::types::{InvertedList, Posting};

// =============================================================================
// LEAF: POSTING CURSOR
// =============================================================================

/// A posting list with a cursor and the collection frequency used to smooth
/// its scores. Wraps a real term's list or a synthetic window list.
#[derive(Debug, Clone)]
pub struct PostingsNode {
    list: InvertedList,
    cursor: usize,
    ctf: u64,
}

impl PostingsNode {
    fn new(list: InvertedList, ctf: u64) -> Self {
        PostingsNode {
            list,
            cursor: 0,
            ctf,
        }
    }

    fn has_more(&self) -> bool {
        self.cursor < self.list.postings().len()
    }

    fn current(&self) -> Option<&Posting> {
        self.list.postings().get(self.cursor)
    }

    fn skip_to(&mut self, doc_id: u32) {
        let postings = self.list.postings();
        while self.cursor < postings.len() && postings[self.cursor].doc_id < doc_id {
            self.cursor += 1;
        }
    }

    /// Dirichlet log likelihood of this leaf for `doc_id`. The cursor must
    /// already be at or past `doc_id`; a cursor sitting elsewhere means the
    /// document does not contain the term and scores with `dtf = 0`.
    fn score(&self, doc_id: u32, index: &InvertedIndex) -> f64 {
        let dtf = match self.current() {
            Some(posting) if posting.doc_id == doc_id => f64::from(posting.dtf()),
            _ => 0.0,
        };
        dirichlet_score(
            dtf,
            f64::from(index.get_doc_length(doc_id)),
            self.ctf as f64,
            index.get_collection_length() as f64,
            NETWORK_MU,
        )
    }
}

// =============================================================================
// NODE SUM TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeliefOp {
    Not,
    Or,
    Max,
    WeightedAnd,
    WeightedSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Require,
    Reject,
}

#[derive(Debug, Clone)]
pub struct BeliefNode {
    op: BeliefOp,
    children: Vec<QueryNode>,
    weights: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct FilterNode {
    op: FilterOp,
    query: Box<QueryNode>,
    filter: Box<QueryNode>,
}

#[derive(Debug, Clone)]
pub enum QueryNode {
    /// A term's posting list or a proximity node's synthetic window list.
    Postings(PostingsNode),
    Belief(BeliefNode),
    Filter(FilterNode),
}

/// Which window extractor a proximity node runs.
enum WindowKind {
    Ordered,
    Unordered,
}

impl QueryNode {
    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    /// A leaf over one term's inverted list.
    pub fn term(index: &InvertedIndex, term: &str) -> io::Result<QueryNode> {
        let list = index.get_inverted_list(term)?;
        let ctf = index.get_ctf(term);
        Ok(QueryNode::Postings(PostingsNode::new(list, ctf)))
    }

    /// Terms in query order, each consecutive pair at most `window_size`
    /// apart.
    pub fn ordered_window(
        index: &InvertedIndex,
        terms: &[String],
        window_size: u32,
    ) -> io::Result<QueryNode> {
        Self::window(index, terms, WindowKind::Ordered, window_size)
    }

    /// Terms in any order within a span of `window_size`.
    pub fn unordered_window(
        index: &InvertedIndex,
        terms: &[String],
        window_size: u32,
    ) -> io::Result<QueryNode> {
        Self::window(index, terms, WindowKind::Unordered, window_size)
    }

    /// All terms somewhere in the same document: an unordered window with an
    /// unbounded span.
    pub fn boolean_and(index: &InvertedIndex, terms: &[String]) -> io::Result<QueryNode> {
        Self::window(index, terms, WindowKind::Unordered, u32::MAX)
    }

    fn window(
        index: &InvertedIndex,
        terms: &[String],
        kind: WindowKind,
        window_size: u32,
    ) -> io::Result<QueryNode> {
        let mut term_nodes = Vec::with_capacity(terms.len());
        for term in terms {
            let list = index.get_inverted_list(term)?;
            term_nodes.push(PostingsNode::new(list, index.get_ctf(term)));
        }
        let (list, ctf) = extract_window_list(&mut term_nodes, &kind, window_size);
        Ok(QueryNode::Postings(PostingsNode::new(list, ctf)))
    }

    pub fn and(children: Vec<QueryNode>) -> QueryNode {
        let weights = vec![1.0; children.len()];
        Self::weighted_and(children, weights)
    }

    pub fn weighted_and(children: Vec<QueryNode>, weights: Vec<f64>) -> QueryNode {
        assert_eq!(children.len(), weights.len(), "one weight per child");
        QueryNode::Belief(BeliefNode {
            op: BeliefOp::WeightedAnd,
            children,
            weights,
        })
    }

    pub fn sum(children: Vec<QueryNode>) -> QueryNode {
        let weights = vec![1.0; children.len()];
        Self::weighted_sum(children, weights)
    }

    pub fn weighted_sum(children: Vec<QueryNode>, weights: Vec<f64>) -> QueryNode {
        assert_eq!(children.len(), weights.len(), "one weight per child");
        QueryNode::Belief(BeliefNode {
            op: BeliefOp::WeightedSum,
            children,
            weights,
        })
    }

    pub fn or(children: Vec<QueryNode>) -> QueryNode {
        let weights = vec![1.0; children.len()];
        QueryNode::Belief(BeliefNode {
            op: BeliefOp::Or,
            children,
            weights,
        })
    }

    pub fn max(children: Vec<QueryNode>) -> QueryNode {
        let weights = vec![1.0; children.len()];
        QueryNode::Belief(BeliefNode {
            op: BeliefOp::Max,
            children,
            weights,
        })
    }

    pub fn not(child: QueryNode) -> QueryNode {
        QueryNode::Belief(BeliefNode {
            op: BeliefOp::Not,
            children: vec![child],
            weights: vec![1.0],
        })
    }

    /// Score with `query`, but only where `filter` also matches.
    pub fn require(query: QueryNode, filter: QueryNode) -> QueryNode {
        QueryNode::Filter(FilterNode {
            op: FilterOp::Require,
            query: Box::new(query),
            filter: Box::new(filter),
        })
    }

    /// Score with `query`, but zero out documents where `filter` matches.
    pub fn reject(query: QueryNode, filter: QueryNode) -> QueryNode {
        QueryNode::Filter(FilterNode {
            op: FilterOp::Reject,
            query: Box::new(query),
            filter: Box::new(filter),
        })
    }

    // ------------------------------------------------------------------
    // The four operations
    // ------------------------------------------------------------------

    pub fn has_more(&self) -> bool {
        match self {
            QueryNode::Postings(node) => node.has_more(),
            QueryNode::Belief(node) => node.children.iter().any(QueryNode::has_more),
            QueryNode::Filter(node) => match node.op {
                FilterOp::Require => node.query.has_more() && node.filter.has_more(),
                FilterOp::Reject => node.query.has_more(),
            },
        }
    }

    /// The posting this node would score next: a leaf's cursor position, the
    /// minimum head across belief children, or the filter's combined head.
    pub fn next_candidate(&self) -> Option<&Posting> {
        match self {
            QueryNode::Postings(node) => node.current(),
            QueryNode::Belief(node) => {
                let mut best: Option<&Posting> = None;
                for child in &node.children {
                    if let Some(posting) = child.next_candidate() {
                        if best.map_or(true, |b| posting.doc_id < b.doc_id) {
                            best = Some(posting);
                        }
                    }
                }
                best
            }
            QueryNode::Filter(node) => match node.op {
                // Require can only land where both sides land, so the later
                // of the two heads is the next candidate worth considering.
                FilterOp::Require => {
                    match (node.query.next_candidate(), node.filter.next_candidate()) {
                        (Some(q), Some(f)) => Some(if q.doc_id >= f.doc_id { q } else { f }),
                        _ => None,
                    }
                }
                FilterOp::Reject => node.query.next_candidate(),
            },
        }
    }

    /// Advance past every posting with doc_id strictly less than `doc_id`.
    pub fn skip_to(&mut self, doc_id: u32) {
        match self {
            QueryNode::Postings(node) => node.skip_to(doc_id),
            QueryNode::Belief(node) => {
                for child in &mut node.children {
                    child.skip_to(doc_id);
                }
            }
            QueryNode::Filter(node) => {
                node.query.skip_to(doc_id);
                node.filter.skip_to(doc_id);
            }
        }
    }

    /// Log-probability contribution of this subtree for `doc_id`.
    ///
    /// Callers must `skip_to(doc_id)` first so every leaf's cursor is at or
    /// past the document; a leaf whose cursor is elsewhere scores the
    /// document as not containing its term.
    pub fn score(&mut self, doc_id: u32, index: &InvertedIndex) -> f64 {
        match self {
            QueryNode::Postings(node) => node.score(doc_id, index),
            QueryNode::Belief(node) => node.score(doc_id, index),
            QueryNode::Filter(node) => {
                node.filter.skip_to(doc_id);
                let landed = node
                    .filter
                    .next_candidate()
                    .is_some_and(|p| p.doc_id == doc_id);
                match (node.op, landed) {
                    (FilterOp::Require, true) | (FilterOp::Reject, false) => {
                        node.query.score(doc_id, index)
                    }
                    _ => 0.0,
                }
            }
        }
    }
}

impl BeliefNode {
    fn score(&mut self, doc_id: u32, index: &InvertedIndex) -> f64 {
        match self.op {
            BeliefOp::Not => {
                let probability = self.children[0].score(doc_id, index).exp();
                (1.0 - probability).ln()
            }
            BeliefOp::Or => {
                // ln(1 − Π(1 − p_i)) computed through the children's logs.
                let mut log_none_match = 0.0;
                for child in &mut self.children {
                    log_none_match += (1.0 - child.score(doc_id, index).exp()).ln();
                }
                (1.0 - log_none_match.exp()).ln()
            }
            BeliefOp::Max => {
                let mut best = f64::NEG_INFINITY;
                for child in &mut self.children {
                    best = best.max(child.score(doc_id, index));
                }
                best
            }
            BeliefOp::WeightedAnd => {
                let mut total = 0.0;
                for (child, weight) in self.children.iter_mut().zip(&self.weights) {
                    total += weight * child.score(doc_id, index);
                }
                total
            }
            BeliefOp::WeightedSum => {
                let mut total_probability = 0.0;
                let mut total_weight = 0.0;
                for (child, weight) in self.children.iter_mut().zip(&self.weights) {
                    total_probability += weight * child.score(doc_id, index).exp();
                    total_weight += weight;
                }
                (total_probability / total_weight).ln()
            }
        }
    }
}

/// Drive the term cursors through every document where all terms align, and
/// collect the qualifying window starts into a synthetic inverted list.
///
/// Returns the list and its aggregated count (total windows found), which
/// serves as the node's collection frequency for smoothing.
fn extract_window_list(
    term_nodes: &mut [PostingsNode],
    kind: &WindowKind,
    window_size: u32,
) -> (InvertedList, u64) {
    let mut list = InvertedList::new();
    let mut ctf = 0u64;
    if term_nodes.is_empty() {
        return (list, ctf);
    }

    while term_nodes.iter().all(PostingsNode::has_more) {
        let max_doc = term_nodes
            .iter()
            .map(|n| n.current().unwrap().doc_id)
            .max()
            .unwrap();

        // The document with the largest head is the only one all terms can
        // still agree on; everything before it is skippable.
        for node in term_nodes.iter_mut() {
            node.skip_to(max_doc);
        }
        let aligned = term_nodes
            .iter()
            .all(|n| n.current().map(|p| p.doc_id) == Some(max_doc));

        if aligned {
            let starts = match kind {
                WindowKind::Ordered => {
                    let positions: Vec<&[u32]> = term_nodes
                        .iter()
                        .map(|n| n.current().unwrap().positions.as_slice())
                        .collect();
                    ordered_window_starts(&positions, window_size)
                }
                WindowKind::Unordered => {
                    let positions: Vec<Vec<u32>> = term_nodes
                        .iter()
                        .map(|n| n.current().unwrap().positions.clone())
                        .collect();
                    unordered_window_starts(positions, window_size)
                }
            };
            if !starts.is_empty() {
                ctf += starts.len() as u64;
                list.add_posting_with_positions(max_doc, starts);
            }
        }

        for node in term_nodes.iter_mut() {
            node.skip_to(max_doc + 1);
        }
    }

    (list, ctf)
}
