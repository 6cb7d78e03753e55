// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dice coefficients over the positional index.
//!
//! For a term `a`, ranks every vocabulary term `b` by `n_ab / (n_a + n_b)`,
//! where `n_ab` counts the places `b` immediately follows `a` and the
//! denominators are collection frequencies. The bigram count is a two-pointer
//! merge over the two posting lists, then over the two position lists within
//! each shared document — positions earn their keep here.

use std::io;

use crate::index::InvertedIndex;
use crate::types::Posting;

pub struct DiceCoefficient<'a> {
    index: &'a InvertedIndex,
}

impl<'a> DiceCoefficient<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        DiceCoefficient { index }
    }

    /// The top `count` `(term, coefficient)` pairs for `term`, sorted
    /// descending by coefficient.
    pub fn calculate(&self, term: &str, count: usize) -> io::Result<Vec<(String, f64)>> {
        let list_a = self.index.get_inverted_list(term)?;
        let n_a = self.index.get_ctf(term);

        let mut coefficients = Vec::with_capacity(self.index.get_vocabulary().len());
        for term_b in self.index.get_vocabulary() {
            let n_b = self.index.get_ctf(term_b);
            let list_b = self.index.get_inverted_list(term_b)?;
            let n_ab = consecutive_occurrences(list_a.postings(), list_b.postings());
            coefficients.push((term_b.clone(), n_ab as f64 / (n_a + n_b) as f64));
        }

        coefficients.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        coefficients.truncate(count);
        Ok(coefficients)
    }
}

/// How often a position `p` in `postings_a` is followed by `p + 1` in
/// `postings_b` within the same document.
fn consecutive_occurrences(postings_a: &[Posting], postings_b: &[Posting]) -> u64 {
    let mut n_ab = 0u64;
    let mut a = 0usize;
    let mut b = 0usize;

    while a < postings_a.len() && b < postings_b.len() {
        let doc_a = postings_a[a].doc_id;
        let doc_b = postings_b[b].doc_id;
        if doc_a < doc_b {
            a += 1;
        } else if doc_b < doc_a {
            b += 1;
        } else {
            let positions_a = &postings_a[a].positions;
            let positions_b = &postings_b[b].positions;
            let mut i = 0usize;
            let mut j = 0usize;
            while i < positions_a.len() && j < positions_b.len() {
                let follower = positions_a[i] + 1;
                if follower < positions_b[j] {
                    i += 1;
                } else if follower > positions_b[j] {
                    j += 1;
                } else {
                    n_ab += 1;
                    i += 1;
                    j += 1;
                }
            }
            a += 1;
            b += 1;
        }
    }
    n_ab
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::index_from_texts;

    #[test]
    fn consecutive_pairs_are_counted_across_documents() {
        let index = index_from_texts(&["king lear speaks", "mad king lear", "king of france"]);
        let a = index.get_inverted_list("king").unwrap();
        let b = index.get_inverted_list("lear").unwrap();
        assert_eq!(consecutive_occurrences(a.postings(), b.postings()), 2);
    }

    #[test]
    fn best_pair_is_the_most_frequent_follower() {
        let index = index_from_texts(&["king lear speaks", "mad king lear", "king of france"]);
        let dice = DiceCoefficient::new(&index);
        let top = dice.calculate("king", 1).unwrap();
        // n_king = 3, n_lear = 2, n_ab = 2 -> 2/5, the highest coefficient.
        assert_eq!(top[0].0, "lear");
        assert!((top[0].1 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn non_adjacent_co_occurrence_scores_zero() {
        let index = index_from_texts(&["king speaks lear"]);
        let a = index.get_inverted_list("king").unwrap();
        let b = index.get_inverted_list("lear").unwrap();
        assert_eq!(consecutive_occurrences(a.postings(), b.postings()), 0);
    }

    #[test]
    fn count_limits_the_pairs() {
        let index = index_from_texts(&["a b c d e"]);
        let dice = DiceCoefficient::new(&index);
        assert_eq!(dice.calculate("a", 3).unwrap().len(), 3);
    }
}
