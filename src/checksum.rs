//! CRC32 checksums over coding payloads
//!
//! A standalone integrity utility for the protocol layer, alongside (not
//! inside) the encode/decode pipeline: BIP covers the in-pipeline parity,
//! CRC32 covers whole-message checks before framing.

use crc32fast::Hasher;

/// Compute the CRC32 (IEEE) of `data`
pub fn calculate_crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Recompute and compare
pub fn verify_crc32(data: &[u8], expected: u32) -> bool {
    calculate_crc32(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_check_value() {
        // The standard CRC32/IEEE check value
        assert_eq!(calculate_crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(calculate_crc32(b""), 0);
    }

    #[test]
    fn test_verify_round_trip() {
        let data = b"J12.6 air track update";
        let crc = calculate_crc32(data);
        assert!(verify_crc32(data, crc));
        assert!(!verify_crc32(b"J12.6 air track updatf", crc));
    }
}
