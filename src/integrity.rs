//! BIP (Bit Integrity Parity) coding
//!
//! A lightweight 5-bit grouped-parity integrity code: the payload's bit
//! sequence (MSB-first within each byte) is folded into five parity groups
//! by `bit_index mod 5`, and each group's tag bit forces the group to odd
//! total parity. The tag detects any single-bit corruption and can repair
//! one flipped bit when its parity group contains exactly one payload bit.
//!
//! All functions are pure; the tag is a deterministic function of the
//! payload bytes alone.

use crate::domain::IntegrityTag;
use log::debug;
use thiserror::Error;

/// Integrity correction failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// The observed parity error pattern is not a single uniquely locatable
    /// bit; a 5-bit single-error code cannot repair it
    #[error("parity error pattern {pattern} is not single-bit correctable")]
    Uncorrectable { pattern: IntegrityTag },
}

/// Compute the 5-bit odd-parity tag for `data`.
///
/// An empty payload yields the all-zero tag.
pub fn calculate(data: &[u8]) -> IntegrityTag {
    if data.is_empty() {
        return IntegrityTag::ZERO;
    }

    let mut ones = [0u32; IntegrityTag::GROUPS];
    for (byte_idx, &byte) in data.iter().enumerate() {
        for bit in 0..8 {
            if (byte >> (7 - bit)) & 1 == 1 {
                ones[(byte_idx * 8 + bit) % IntegrityTag::GROUPS] += 1;
            }
        }
    }

    // Tag bit set whenever the group's data-bit count is even, so the total
    // parity (data bits + tag bit) is always odd.
    let mut bits = 0u8;
    for (group, &count) in ones.iter().enumerate() {
        if count % 2 == 0 {
            bits |= 1 << (4 - group);
        }
    }
    IntegrityTag::from_bits(bits)
}

/// Recompute the tag for `data` and compare with `tag`
pub fn verify(data: &[u8], tag: IntegrityTag) -> bool {
    calculate(data) == tag
}

/// Append the tag to the payload as one trailing byte
pub fn append_tag(data: &[u8]) -> Vec<u8> {
    let tag = calculate(data);
    let mut out = Vec::with_capacity(data.len() + 1);
    out.extend_from_slice(data);
    out.push(tag.as_byte());
    out
}

/// Split a tagged buffer into payload and tag.
///
/// An empty buffer is an empty payload with the zero tag (the shape an empty
/// payload round-trips to after RS zero-stripping).
pub fn split_tag(data_with_tag: &[u8]) -> (&[u8], IntegrityTag) {
    match data_with_tag.split_last() {
        Some((&tag_byte, payload)) => (payload, IntegrityTag::from_bits(tag_byte)),
        None => (&[], IntegrityTag::ZERO),
    }
}

/// Attempt to repair a single flipped bit in a tagged buffer.
///
/// The XOR of the expected and received tags gives the parity error
/// pattern. When the pattern names exactly one parity group and that group
/// covers exactly one payload bit position, that bit is flipped and the
/// repaired buffer returned. Any other pattern is beyond a 5-bit
/// single-error code and comes back as [`IntegrityError::Uncorrectable`],
/// leaving the caller's input untouched.
pub fn correct_single_bit(data_with_tag: &[u8]) -> Result<Vec<u8>, IntegrityError> {
    let (payload, received) = split_tag(data_with_tag);
    let expected = calculate(payload);
    if expected == received {
        return Ok(data_with_tag.to_vec());
    }

    let pattern = expected ^ received;
    if pattern.count_ones() != 1 {
        return Err(IntegrityError::Uncorrectable { pattern });
    }
    let group = (0..IntegrityTag::GROUPS)
        .find(|&g| pattern.bit(g))
        .unwrap_or(0);

    // Candidate payload bit positions whose parity group matches the pattern
    let bit_len = payload.len() * 8;
    let mut candidates = (group..bit_len).step_by(IntegrityTag::GROUPS);
    let (first, second) = (candidates.next(), candidates.next());
    match (first, second) {
        (Some(pos), None) => {
            let mut repaired = data_with_tag.to_vec();
            repaired[pos / 8] ^= 1 << (7 - pos % 8);
            debug!("BIP repair: flipped bit {} (parity group {})", pos, group);
            Ok(repaired)
        }
        _ => Err(IntegrityError::Uncorrectable { pattern }),
    }
}
