// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Window extraction: where do all the query terms land close together?
//!
//! Both extractors take one positions list per query term (all within a
//! single document) and return the start positions of qualifying windows.
//!
//! **Ordered**: terms must appear in query order, each consecutive pair at
//! most `window_size` apart. A window starts at `p_0` from the first term's
//! list iff positions `p_0 < p_1 < … < p_{k−1}` exist, one per list, with
//! `p_i − p_{i−1} ≤ window_size`. One pointer per list advances monotonically
//! over the whole extraction; only the first term's positions are ever
//! revisited.
//!
//! **Unordered**: any order, bounded span. Lists are kept sorted by their
//! heads; the smallest head is popped as a window start and qualifies iff
//! every other list's head falls strictly inside `(start, start +
//! window_size)` going left to right.
//!
//! The unordered extractor has one famous trap: duplicate query terms
//! ("to be or not to be") hand it identical lists, and popping the shared
//! smallest head would drain every copy through the same front positions —
//! the second occurrence never gets a window of its own. The fix is to
//! detect lists with equal heads up front and deal each duplicate group's
//! positions round-robin across the copies, so each occurrence works from its
//! own stride of the list.

use std::collections::VecDeque;

/// Start positions of ordered windows, one list per term in query order.
pub fn ordered_window_starts(term_positions: &[&[u32]], window_size: u32) -> Vec<u32> {
    let num_terms = term_positions.len();
    if num_terms == 0 {
        return Vec::new();
    }
    if num_terms == 1 {
        return term_positions[0].to_vec();
    }

    let mut starts = Vec::new();
    let mut pointers = vec![0usize; num_terms];

    'starts: for &window_start in term_positions[0] {
        let mut previous = window_start;
        for term in 1..num_terms {
            let positions = term_positions[term];
            // The earliest position after the previous link is the best
            // candidate: anything smaller can never serve a later start.
            while pointers[term] < positions.len() && positions[pointers[term]] <= previous {
                pointers[term] += 1;
            }
            if pointers[term] == positions.len() {
                // This term has nothing after `previous`; later starts only
                // move `previous` further right.
                break 'starts;
            }
            let position = positions[pointers[term]];
            if position - previous > window_size {
                continue 'starts;
            }
            previous = position;
        }
        starts.push(window_start);
    }

    starts
}

/// Start positions of unordered windows with span bound `window_size`.
///
/// `window_size = u32::MAX` turns this into a plain document-level AND: every
/// co-occurrence qualifies regardless of distance.
pub fn unordered_window_starts(term_positions: Vec<Vec<u32>>, window_size: u32) -> Vec<u32> {
    let num_terms = term_positions.len();
    if num_terms == 0 {
        return Vec::new();
    }
    if num_terms == 1 {
        return term_positions.into_iter().next().unwrap();
    }

    let mut lists: Vec<VecDeque<u32>> = distribute_duplicates(term_positions)
        .into_iter()
        .map(VecDeque::from)
        .collect();

    let mut starts = Vec::new();
    while lists.iter().all(|l| !l.is_empty()) {
        lists.sort_by_key(|l| *l.front().unwrap());
        let window_start = lists[0].pop_front().unwrap();
        let bound = window_start.saturating_add(window_size);

        let mut previous = window_start;
        let mut all_inside = true;
        for list in &lists[1..] {
            let head = *list.front().unwrap();
            if previous < head && head < bound {
                previous = head;
            } else {
                all_inside = false;
                break;
            }
        }
        if all_inside {
            starts.push(window_start);
        }
    }

    starts
}

/// Deal each group of lists with equal heads round-robin across the group.
///
/// A group of `k` identical lists (duplicate query terms) becomes `k` strided
/// slices `positions[i], positions[i+k], …`; lists with unique heads pass
/// through untouched. Sorts the lists by head first so equal heads sit next
/// to each other.
fn distribute_duplicates(mut term_positions: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
    term_positions.sort_by_key(|positions| positions[0]);

    let num_terms = term_positions.len();
    let mut distributed = Vec::with_capacity(num_terms);
    let mut current = 0;
    while current < num_terms {
        let head = term_positions[current][0];
        let mut next = current + 1;
        while next < num_terms && term_positions[next][0] == head {
            next += 1;
        }
        let group_size = next - current;
        if group_size > 1 {
            for lane in 0..group_size {
                let stride: Vec<u32> = term_positions[current]
                    .iter()
                    .skip(lane)
                    .step_by(group_size)
                    .copied()
                    .collect();
                distributed.push(stride);
            }
        } else {
            distributed.push(std::mem::take(&mut term_positions[current]));
        }
        current = next;
    }
    distributed
}
