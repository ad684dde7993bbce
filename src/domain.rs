//! Core domain types for the Link16 coding layer
//!
//! This module contains validated wrappers for the coding parameters that
//! flow through every pipeline call. These newtypes prevent common mistakes
//! by making it impossible to hand an unvalidated (code_length, data_length)
//! pair or a zero-area interleaver matrix to a coder at compile time.
//!
//! All validation happens at construction. A value that exists is a value
//! the coders can trust, so the transform code itself carries no range
//! checks.

use log::warn;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use thiserror::Error;

/// Construction-time parameter violations
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    /// Reed-Solomon parameters outside `0 < data_length < code_length < 256`
    #[error(
        "invalid RS parameters: code_length={code_length}, data_length={data_length} \
         (need 0 < data_length < code_length < 256)"
    )]
    InvalidRsParameters { code_length: u16, data_length: u16 },

    /// Cipher key size other than 128/192/256 bits
    #[error("unsupported cipher key size: {0} bits (supported: 128, 192, 256)")]
    InvalidKeySize(u16),

    /// Key material that is not valid hex
    #[error("invalid hex key material: {0}")]
    InvalidHexKey(#[from] hex::FromHexError),
}

/// Invalid interleaver dimensions, rejected at configuration time
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("invalid interleaver shape: rows={rows}, cols={cols} (both must be > 0)")]
    ZeroDimension { rows: u16, cols: u16 },
}

/// Reed-Solomon code parameters `(code_length n, data_length k)` over GF(2^8)
///
/// Invariant: `0 < data_length < code_length < 256`. One symbol is one byte,
/// so a block never exceeds 255 symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsParameters {
    code_length: u16,
    data_length: u16,
}

impl RsParameters {
    /// The documented fallback parameters: RS(31, 15), t = 8
    pub const DEFAULT: RsParameters = RsParameters {
        code_length: 31,
        data_length: 15,
    };

    /// Validate and construct RS parameters
    pub fn try_new(code_length: u16, data_length: u16) -> Result<Self, ParameterError> {
        if data_length == 0 || data_length >= code_length || code_length >= 256 {
            return Err(ParameterError::InvalidRsParameters {
                code_length,
                data_length,
            });
        }
        Ok(RsParameters {
            code_length,
            data_length,
        })
    }

    /// Construct RS parameters, falling back to [`RsParameters::DEFAULT`]
    /// when the pair is invalid. The fallback is logged.
    pub fn new_or_default(code_length: u16, data_length: u16) -> Self {
        Self::try_new(code_length, data_length).unwrap_or_else(|e| {
            warn!("{e}; falling back to RS(31, 15)");
            Self::DEFAULT
        })
    }

    /// Total block length `n` in symbols
    pub fn code_length(&self) -> usize {
        self.code_length as usize
    }

    /// Systematic data length `k` in symbols
    pub fn data_length(&self) -> usize {
        self.data_length as usize
    }

    /// Number of parity symbols `n - k`
    pub fn parity_length(&self) -> usize {
        (self.code_length - self.data_length) as usize
    }

    /// Maximum number of correctable symbol errors `t = (n - k) / 2`
    pub fn error_correction_capability(&self) -> usize {
        self.parity_length() / 2
    }
}

impl Default for RsParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RsParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RS({}, {})", self.code_length, self.data_length)
    }
}

/// Interleaver matrix dimensions
///
/// Defines the block size `rows * cols`; payloads are zero-padded up to a
/// multiple of it before the transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterleaverShape {
    rows: u16,
    cols: u16,
}

impl InterleaverShape {
    /// The documented fallback shape: 8×8
    pub const DEFAULT: InterleaverShape = InterleaverShape { rows: 8, cols: 8 };

    /// Validate and construct an interleaver shape
    pub fn try_new(rows: u16, cols: u16) -> Result<Self, ShapeError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeError::ZeroDimension { rows, cols });
        }
        Ok(InterleaverShape { rows, cols })
    }

    /// Construct a shape, falling back to [`InterleaverShape::DEFAULT`] when
    /// a dimension is zero. The fallback is logged.
    pub fn new_or_default(rows: u16, cols: u16) -> Self {
        Self::try_new(rows, cols).unwrap_or_else(|e| {
            warn!("{e}; falling back to 8x8");
            Self::DEFAULT
        })
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Bytes per interleaving matrix
    pub fn block_size(&self) -> usize {
        self.rows() * self.cols()
    }
}

impl Default for InterleaverShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for InterleaverShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A 5-bit BIP parity tag
///
/// Group 0 sits in the most significant of the five bits, so the tag prints
/// in the same order the parity groups are folded (`{:05b}` of `as_byte`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegrityTag(u8);

impl IntegrityTag {
    /// Number of parity groups
    pub const GROUPS: usize = 5;

    /// The all-zero tag, produced for an empty payload
    pub const ZERO: IntegrityTag = IntegrityTag(0);

    /// Build a tag from its low 5 bits; higher bits are discarded
    pub fn from_bits(bits: u8) -> Self {
        IntegrityTag(bits & 0x1F)
    }

    /// One-hot tag with only `group`'s bit set
    pub fn single_group(group: usize) -> Self {
        debug_assert!(group < Self::GROUPS);
        IntegrityTag(1 << (4 - group))
    }

    /// The tag as a byte in `0..=31`
    pub fn as_byte(&self) -> u8 {
        self.0
    }

    /// Parity bit for `group` (0..5)
    pub fn bit(&self, group: usize) -> bool {
        debug_assert!(group < Self::GROUPS);
        (self.0 >> (4 - group)) & 1 == 1
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Number of set parity bits
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitXor for IntegrityTag {
    type Output = IntegrityTag;

    /// XOR of two tags: the error pattern between expected and received
    fn bitxor(self, rhs: IntegrityTag) -> IntegrityTag {
        IntegrityTag(self.0 ^ rhs.0)
    }
}

impl fmt::Display for IntegrityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05b}", self.0)
    }
}

/// Supported AES key sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySize {
    Bits128,
    Bits192,
    #[default]
    Bits256,
}

impl KeySize {
    /// Map a bit count onto a key size
    pub fn from_bits(bits: u16) -> Result<Self, ParameterError> {
        match bits {
            128 => Ok(KeySize::Bits128),
            192 => Ok(KeySize::Bits192),
            256 => Ok(KeySize::Bits256),
            other => Err(ParameterError::InvalidKeySize(other)),
        }
    }

    pub fn bits(&self) -> usize {
        self.byte_len() * 8
    }

    /// Key material length in bytes (16/24/32)
    pub fn byte_len(&self) -> usize {
        match self {
            KeySize::Bits128 => 16,
            KeySize::Bits192 => 24,
            KeySize::Bits256 => 32,
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Symmetric cipher key material, always exactly `size.byte_len()` bytes
///
/// Owned by the pipeline that set it; the coder components never hold on to
/// key material between calls.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey {
    bytes: Vec<u8>,
    size: KeySize,
}

impl CipherKey {
    /// Build a key from raw material, normalizing to the requested size.
    ///
    /// Short material is right-padded with zero bytes and long material is
    /// truncated. Both are documented lossy conventions of the source
    /// system and are logged when they fire.
    pub fn new(material: &[u8], size: KeySize) -> Self {
        let wanted = size.byte_len();
        let mut bytes = material.to_vec();
        match bytes.len().cmp(&wanted) {
            std::cmp::Ordering::Less => {
                warn!(
                    "cipher key material is {} bytes, zero-padding to {} for a {} key",
                    bytes.len(),
                    wanted,
                    size
                );
                bytes.resize(wanted, 0);
            }
            std::cmp::Ordering::Greater => {
                warn!(
                    "cipher key material is {} bytes, truncating to {} for a {} key",
                    bytes.len(),
                    wanted,
                    size
                );
                bytes.truncate(wanted);
            }
            std::cmp::Ordering::Equal => {}
        }
        CipherKey { bytes, size }
    }

    /// Generate a random key of the requested size from the OS CSPRNG
    pub fn generate(size: KeySize) -> Self {
        let mut bytes = vec![0u8; size.byte_len()];
        OsRng.fill_bytes(&mut bytes);
        CipherKey { bytes, size }
    }

    /// Parse hex-encoded key material, then normalize as [`CipherKey::new`]
    pub fn from_hex(material: &str, size: KeySize) -> Result<Self, ParameterError> {
        let bytes = hex::decode(material)?;
        Ok(Self::new(&bytes, size))
    }

    /// The key material as lowercase hex, the source system's key exchange
    /// representation
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Check a hex key string the way the source system did: non-empty,
    /// hex digits only, and enough material for `size`.
    pub fn is_valid_hex(material: &str, size: KeySize) -> bool {
        !material.is_empty()
            && material.chars().all(|c| c.is_ascii_hexdigit())
            && material.len() * 4 >= size.bits()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> KeySize {
        self.size
    }
}

// Key material stays out of logs and debug dumps.
impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherKey({})", self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rs_parameters_validation() {
        assert!(RsParameters::try_new(31, 15).is_ok());
        assert!(RsParameters::try_new(255, 223).is_ok());

        assert!(RsParameters::try_new(31, 0).is_err());
        assert!(RsParameters::try_new(15, 15).is_err());
        assert!(RsParameters::try_new(15, 31).is_err());
        assert!(RsParameters::try_new(256, 100).is_err());
    }

    #[test]
    fn test_rs_parameters_fallback() {
        let params = RsParameters::new_or_default(0, 0);
        assert_eq!(params, RsParameters::DEFAULT);
        assert_eq!(params.code_length(), 31);
        assert_eq!(params.data_length(), 15);
        assert_eq!(params.error_correction_capability(), 8);
    }

    #[test]
    fn test_shape_validation() {
        let shape = InterleaverShape::try_new(4, 4).unwrap();
        assert_eq!(shape.block_size(), 16);

        assert!(InterleaverShape::try_new(0, 4).is_err());
        assert!(InterleaverShape::try_new(4, 0).is_err());
        assert_eq!(InterleaverShape::new_or_default(0, 9), InterleaverShape::DEFAULT);
    }

    #[test]
    fn test_integrity_tag_bit_order() {
        // Group 0 occupies the most significant of the five bits
        let tag = IntegrityTag::from_bits(0b10001);
        assert!(tag.bit(0));
        assert!(!tag.bit(1));
        assert!(!tag.bit(2));
        assert!(!tag.bit(3));
        assert!(tag.bit(4));
        assert_eq!(tag.to_string(), "10001");

        assert_eq!(IntegrityTag::single_group(0).as_byte(), 0b10000);
        assert_eq!(IntegrityTag::single_group(4).as_byte(), 0b00001);
    }

    #[test]
    fn test_integrity_tag_masks_high_bits() {
        assert_eq!(IntegrityTag::from_bits(0xFF).as_byte(), 0x1F);
    }

    #[test]
    fn test_cipher_key_normalization() {
        // Short material is zero-padded
        let key = CipherKey::new(b"short", KeySize::Bits128);
        assert_eq!(key.as_bytes().len(), 16);
        assert_eq!(&key.as_bytes()[..5], b"short");
        assert!(key.as_bytes()[5..].iter().all(|&b| b == 0));

        // Long material is truncated
        let long = [0xAA; 40];
        let key = CipherKey::new(&long, KeySize::Bits256);
        assert_eq!(key.as_bytes().len(), 32);

        // Exact material passes through
        let exact = [0x42; 24];
        let key = CipherKey::new(&exact, KeySize::Bits192);
        assert_eq!(key.as_bytes(), &exact);
    }

    #[test]
    fn test_cipher_key_hex_round_trip() {
        let key = CipherKey::generate(KeySize::Bits128);
        let hex = key.to_hex();
        assert_eq!(hex.len(), 32);
        let parsed = CipherKey::from_hex(&hex, KeySize::Bits128).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_cipher_key_hex_validity() {
        assert!(CipherKey::is_valid_hex(&"ab".repeat(16), KeySize::Bits128));
        assert!(!CipherKey::is_valid_hex("", KeySize::Bits128));
        assert!(!CipherKey::is_valid_hex("xyz", KeySize::Bits128));
        // Too little material for the size
        assert!(!CipherKey::is_valid_hex("abcd", KeySize::Bits256));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = CipherKey::generate(KeySize::Bits256);
        let b = CipherKey::generate(KeySize::Bits256);
        assert_eq!(a.as_bytes().len(), 32);
        assert_ne!(a, b);
    }
}
