// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary persistence for inverted lists.
//!
//! The index keeps its heavy data — the posting lists — in a single binary
//! file per framing, `{compressed,uncompressed}/inverted_lists`, written as a
//! plain concatenation with no headers or separators. The JSON lookup table
//! alongside it maps each term to `(posting_list_position, posting_list_size,
//! df, ctf)`; reading a list is a seek, an exact-length read, and a decode
//! bounded by `df`.
//!
//! ```text
//! inverted_lists (uncompressed)          inverted_lists (compressed)
//! ┌──────────────────────────────┐       ┌──────────────────────────────┐
//! │ term A: df × (doc_id, dtf,   │       │ term A: varbyte stream of    │
//! │         dtf × position) i32LE│       │   Δdoc_id, dtf, Δpositions…  │
//! ├──────────────────────────────┤       ├──────────────────────────────┤
//! │ term B: …                    │       │ term B: …                    │
//! └──────────────────────────────┘       └──────────────────────────────┘
//! ```
//!
//! Both framings decode to identical [`InvertedList`](crate::types::InvertedList)
//! values; which one a given index uses is recorded in its config artifact.

pub mod encoding;
pub mod postings;

pub use encoding::{delta_decode, delta_encode, vbyte_decode, vbyte_encode, MAX_VBYTE_BYTES};
pub use postings::{bytes_to_postings, postings_to_bytes};
