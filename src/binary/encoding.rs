// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Integer compression primitives: delta encoding and variable-byte codes.
//!
//! Posting lists are sequences of small, mostly-increasing integers, which is
//! exactly what these two classics were made for. Delta encoding turns sorted
//! positions into small gaps, and the varbyte code spends one byte on anything
//! under 128.
//!
//! The varbyte convention here is the textbook one: a number is written as
//! 7-bit groups, least significant first, with a *clear* high bit on every
//! continuation byte and a *set* high bit on the terminating byte. Note that
//! this is the opposite of LEB128/protobuf, where the set bit means "more to
//! come". Files written with one convention are garbage under the other, so
//! this module is the only place the bit layout is allowed to live.
//!
//! # References
//!
//! - **Variable-byte codes**: Croft, Metzler, Strohman (2009): "Search Engines:
//!   Information Retrieval in Practice", §5.4 "Compression".
//! - **Delta (d-gap) encoding**: Zobel & Moffat (2006): "Inverted Files for
//!   Text Search Engines", ACM Computing Surveys.

use std::io;

/// Longest legal varbyte sequence for a `u32` (five 7-bit groups).
pub const MAX_VBYTE_BYTES: usize = 5;

// ============================================================================
// DELTA ENCODING
// ============================================================================

/// Replace a non-decreasing sequence with its first-order differences.
///
/// `[3, 7, 11]` becomes `[3, 4, 4]`. The first element is kept as-is.
pub fn delta_encode(values: &[u32]) -> Vec<u32> {
    let mut deltas = Vec::with_capacity(values.len());
    let mut previous = 0u32;
    for &value in values {
        deltas.push(value - previous);
        previous = value;
    }
    deltas
}

/// Exact inverse of [`delta_encode`]: running sum of the gaps.
pub fn delta_decode(deltas: &[u32]) -> Vec<u32> {
    let mut values = Vec::with_capacity(deltas.len());
    let mut previous = 0u32;
    for &delta in deltas {
        previous += delta;
        values.push(previous);
    }
    values
}

// ============================================================================
// VARBYTE ENCODING
// ============================================================================

/// Append the varbyte encoding of each number to `buf`.
///
/// Low 7-bit groups come first; every group except the last has its high bit
/// clear, and the final group carries a set high bit as the terminator.
pub fn vbyte_encode(values: &[u32], buf: &mut Vec<u8>) {
    for &value in values {
        let mut value = value;
        while value >= 0x80 {
            buf.push((value & 0x7F) as u8);
            value >>= 7;
        }
        buf.push((value as u8) | 0x80);
    }
}

/// Decode a whole buffer of varbyte numbers, returning the integer stream.
///
/// Returns an error if:
/// - the buffer ends in the middle of a number (truncation)
/// - a number runs longer than [`MAX_VBYTE_BYTES`] or overflows 32 bits
///   (corruption)
pub fn vbyte_decode(bytes: &[u8]) -> io::Result<Vec<u32>> {
    let mut values = Vec::new();
    let mut current: u64 = 0;
    let mut shift = 0u32;
    let mut group_count = 0usize;

    for &byte in bytes {
        if group_count >= MAX_VBYTE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Varbyte number exceeds maximum length (possible corruption)",
            ));
        }
        current |= u64::from(byte & 0x7F) << shift;
        group_count += 1;
        if byte & 0x80 != 0 {
            // Terminator bit set: the number is complete.
            let value = u32::try_from(current).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Varbyte number overflows 32 bits",
                )
            })?;
            values.push(value);
            current = 0;
            shift = 0;
            group_count = 0;
        } else {
            shift += 7;
        }
    }

    if group_count != 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Buffer ends in the middle of a varbyte number",
        ));
    }

    Ok(values)
}
