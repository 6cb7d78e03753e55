// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted-list serialization: the two on-disk framings.
//!
//! Lists are written back to back with no separators, so neither framing is
//! self-describing: the decoder needs the term's `df` from the lookup table to
//! know how many postings to consume, and the byte length from the lookup
//! table must account for the whole slice. Anything left over is corruption.
//!
//! **Uncompressed**: per posting, a little-endian `i32` doc_id, an `i32` dtf,
//! then `dtf` little-endian `i32` positions. Fixed-width and seekable-ish, at
//! four bytes per integer.
//!
//! **Compressed**: the whole list is flattened into one integer stream —
//! doc_id gap from the previous posting (starting from 0), dtf, then the
//! delta-encoded positions (per document, the gap sequence restarts at every
//! posting) — and the stream is varbyte-coded as a single buffer.

use std::io;

use crate::binary::encoding::{delta_decode, delta_encode, vbyte_decode, vbyte_encode};
use crate::types::InvertedList;

/// Encode an inverted list under either framing.
pub fn postings_to_bytes(list: &InvertedList, compressed: bool) -> Vec<u8> {
    if compressed {
        let mut stream: Vec<u32> = Vec::new();
        let mut previous_doc_id = 0u32;
        for posting in list.postings() {
            stream.push(posting.doc_id - previous_doc_id);
            stream.push(posting.dtf());
            stream.extend(delta_encode(&posting.positions));
            previous_doc_id = posting.doc_id;
        }
        let mut buf = Vec::new();
        vbyte_encode(&stream, &mut buf);
        buf
    } else {
        let mut buf = Vec::new();
        for posting in list.postings() {
            buf.extend_from_slice(&(posting.doc_id as i32).to_le_bytes());
            buf.extend_from_slice(&(posting.dtf() as i32).to_le_bytes());
            for &position in &posting.positions {
                buf.extend_from_slice(&(position as i32).to_le_bytes());
            }
        }
        buf
    }
}

/// Decode exactly `df` postings from `bytes`.
///
/// The slice must contain the list and nothing else; a short or oversized
/// buffer means the lookup table and the binary file disagree, which is fatal.
pub fn bytes_to_postings(bytes: &[u8], compressed: bool, df: u32) -> io::Result<InvertedList> {
    if compressed {
        decode_compressed(bytes, df)
    } else {
        decode_uncompressed(bytes, df)
    }
}

fn decode_uncompressed(bytes: &[u8], df: u32) -> io::Result<InvertedList> {
    let mut list = InvertedList::new();
    let mut pos = 0usize;

    for _ in 0..df {
        let doc_id = read_i32_le(bytes, &mut pos)?;
        let dtf = read_i32_le(bytes, &mut pos)?;
        if doc_id < 0 || dtf < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Negative doc_id or dtf in posting list",
            ));
        }
        let mut positions = Vec::with_capacity(dtf as usize);
        for _ in 0..dtf {
            let position = read_i32_le(bytes, &mut pos)?;
            if position < 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Negative term position in posting list",
                ));
            }
            positions.push(position as u32);
        }
        list.add_posting_with_positions(doc_id as u32, positions);
    }

    if pos != bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Posting list size mismatch: {} trailing bytes after {} postings",
                bytes.len() - pos,
                df
            ),
        ));
    }

    Ok(list)
}

fn decode_compressed(bytes: &[u8], df: u32) -> io::Result<InvertedList> {
    let stream = vbyte_decode(bytes)?;
    let mut list = InvertedList::new();
    let mut pointer = 0usize;
    let mut previous_doc_id = 0u32;

    for _ in 0..df {
        let doc_gap = *stream.get(pointer).ok_or_else(truncated)?;
        let dtf = *stream.get(pointer + 1).ok_or_else(truncated)? as usize;
        pointer += 2;

        let end = pointer.checked_add(dtf).filter(|&e| e <= stream.len());
        let deltas = match end {
            Some(end) => &stream[pointer..end],
            None => return Err(truncated()),
        };
        pointer += dtf;

        let doc_id = previous_doc_id + doc_gap;
        list.add_posting_with_positions(doc_id, delta_decode(deltas));
        previous_doc_id = doc_id;
    }

    if pointer != stream.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Posting list size mismatch: {} trailing integers after {} postings",
                stream.len() - pointer,
                df
            ),
        ));
    }

    Ok(list)
}

fn read_i32_le(bytes: &[u8], pos: &mut usize) -> io::Result<i32> {
    let end = pos.checked_add(4).filter(|&e| e <= bytes.len());
    match end {
        Some(end) => {
            let value = i32::from_le_bytes(bytes[*pos..end].try_into().unwrap());
            *pos = end;
            Ok(value)
        }
        None => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Truncated posting list",
        )),
    }
}

fn truncated() -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "Truncated compressed posting list",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_list() -> InvertedList {
        let mut list = InvertedList::new();
        for &p in &[0u32, 3, 7] {
            list.add_posting(5, p);
        }
        list
    }

    #[test]
    fn uncompressed_layout_matches_the_wire_format() {
        // (doc_id=5, positions=[0,3,7]) -> five i32 LE words, 20 bytes.
        let bytes = postings_to_bytes(&sample_list(), false);
        assert_eq!(
            bytes,
            vec![
                0x05, 0x00, 0x00, 0x00, // doc_id
                0x03, 0x00, 0x00, 0x00, // dtf
                0x00, 0x00, 0x00, 0x00, // position 0
                0x03, 0x00, 0x00, 0x00, // position 3
                0x07, 0x00, 0x00, 0x00, // position 7
            ]
        );
    }

    #[test]
    fn uncompressed_round_trips() {
        let list = sample_list();
        let bytes = postings_to_bytes(&list, false);
        assert_eq!(bytes_to_postings(&bytes, false, list.df()).unwrap(), list);
    }

    #[test]
    fn compressed_stream_is_gapped_per_document() {
        // Two postings: doc 5 at [0,3,7], doc 9 at [2]. Flattened stream is
        // [5, 3, 0, 3, 4, 4, 1, 2]: doc gap, dtf, position gaps restarting
        // from zero at each posting.
        let mut list = sample_list();
        list.add_posting(9, 2);
        let bytes = postings_to_bytes(&list, true);
        assert_eq!(vbyte_decode(&bytes).unwrap(), vec![5, 3, 0, 3, 4, 4, 1, 2]);
        assert_eq!(bytes_to_postings(&bytes, true, 2).unwrap(), list);
    }

    #[test]
    fn empty_list_encodes_to_nothing() {
        let list = InvertedList::new();
        assert!(postings_to_bytes(&list, false).is_empty());
        assert!(postings_to_bytes(&list, true).is_empty());
        assert_eq!(bytes_to_postings(&[], false, 0).unwrap(), list);
        assert_eq!(bytes_to_postings(&[], true, 0).unwrap(), list);
    }

    #[test]
    fn truncated_uncompressed_list_is_fatal() {
        let bytes = postings_to_bytes(&sample_list(), false);
        let err = bytes_to_postings(&bytes[..10], false, 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn trailing_bytes_are_fatal() {
        let mut bytes = postings_to_bytes(&sample_list(), false);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let err = bytes_to_postings(&bytes, false, 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn compressed_df_overrun_is_fatal() {
        let bytes = postings_to_bytes(&sample_list(), true);
        // Claiming two postings when the stream holds one must fail.
        let err = bytes_to_postings(&bytes, true, 2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    fn list_strategy() -> impl Strategy<Value = InvertedList> {
        // Sorted unique doc ids paired with sorted unique position sets.
        prop::collection::btree_map(
            0u32..10_000,
            prop::collection::btree_set(0u32..5_000, 1..20),
            0..30,
        )
        .prop_map(|map| {
            let mut list = InvertedList::new();
            for (doc_id, positions) in map {
                list.add_posting_with_positions(doc_id, positions.into_iter().collect());
            }
            list
        })
    }

    proptest! {
        #[test]
        fn round_trips_under_both_framings(list in list_strategy()) {
            for &compressed in &[false, true] {
                let bytes = postings_to_bytes(&list, compressed);
                let decoded = bytes_to_postings(&bytes, compressed, list.df()).unwrap();
                prop_assert_eq!(&decoded, &list);
            }
        }

        #[test]
        fn compressed_size_is_bounded_per_integer(list in list_strategy()) {
            let integers: usize = list
                .postings()
                .iter()
                .map(|p| 2 + p.positions.len())
                .sum();
            let bytes = postings_to_bytes(&list, true);
            prop_assert!(bytes.len() <= integers * super::super::encoding::MAX_VBYTE_BYTES);
        }
    }
}
