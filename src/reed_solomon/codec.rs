//! Systematic RS(n, k) encoder/decoder over GF(2^8)

use crate::domain::RsParameters;
use crate::galois::{galois_field, GROUP_ORDER};
use crate::reed_solomon::poly::{generator_poly, poly_eval, Poly};
use log::{debug, warn};
use thiserror::Error;

/// Reed-Solomon coding failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsError {
    /// More information bytes than the code's data length; the caller can
    /// truncate or re-parameterize
    #[error("input of {len} bytes exceeds RS data length {data_length}")]
    InputTooLong { len: usize, data_length: usize },

    /// Received block does not match the configured code length
    #[error("received block is {len} bytes, expected code length {code_length}")]
    BlockLengthMismatch { len: usize, code_length: usize },

    /// Syndrome-derived error pattern exceeds the correction capacity; the
    /// corrupted block is discarded, never returned
    #[error("uncorrectable error pattern in received block")]
    Uncorrectable,
}

/// Systematic Reed-Solomon codec parameterized by `(code_length, data_length)`
///
/// The first `data_length` bytes of every block are the information symbols
/// (zero-padded when the source payload is shorter), followed by
/// `code_length - data_length` parity symbols.
#[derive(Debug, Clone, Copy)]
pub struct ReedSolomonCodec {
    params: RsParameters,
}

impl ReedSolomonCodec {
    pub fn new(params: RsParameters) -> Self {
        ReedSolomonCodec { params }
    }

    pub fn params(&self) -> RsParameters {
        self.params
    }

    /// Encode `data` into a full `code_length`-byte block.
    ///
    /// Data shorter than `data_length` is zero-padded; longer data is
    /// rejected with [`RsError::InputTooLong`].
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, RsError> {
        let n = self.params.code_length();
        let k = self.params.data_length();
        if data.len() > k {
            return Err(RsError::InputTooLong {
                len: data.len(),
                data_length: k,
            });
        }

        let gf = galois_field();
        let gen = generator_poly(n - k);

        // Synthetic division of data(x) * x^(n-k) by g(x); the work buffer is
        // mangled in the data region, the parity region ends up holding the
        // remainder.
        let mut work = vec![0u8; n];
        work[..data.len()].copy_from_slice(data);
        for i in 0..k {
            let coef = work[i];
            if coef != 0 {
                for (j, &g) in gen.iter().enumerate().skip(1) {
                    work[i + j] ^= gf.mul(g, coef);
                }
            }
        }

        let mut block = vec![0u8; n];
        block[..data.len()].copy_from_slice(data);
        block[k..].copy_from_slice(&work[k..]);

        debug!(
            "RS encode: {} data bytes -> {} block ({})",
            data.len(),
            n,
            self.params
        );
        Ok(block)
    }

    /// Correct symbol errors in `block` in place.
    ///
    /// Returns the number of corrected symbols, or [`RsError::Uncorrectable`]
    /// when the error pattern exceeds `t = (n - k) / 2`.
    pub fn correct(&self, block: &mut [u8]) -> Result<usize, RsError> {
        let n = self.params.code_length();
        let t = self.params.error_correction_capability();
        if block.len() != n {
            return Err(RsError::BlockLengthMismatch {
                len: block.len(),
                code_length: n,
            });
        }

        let synd = syndromes(block, self.params.parity_length());
        if synd.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        // Peterson-Gorenstein-Zierler: the largest v <= t with a nonsingular
        // syndrome matrix is the actual error count.
        let lambda = find_error_locator(&synd, t).ok_or(RsError::Uncorrectable)?;

        let positions = chien_search(&lambda, n);
        if positions.len() != lambda.len() {
            warn!(
                "RS decode: locator degree {} but {} roots found; uncorrectable",
                lambda.len(),
                positions.len()
            );
            return Err(RsError::Uncorrectable);
        }

        let magnitudes =
            solve_magnitudes(&synd, &positions, n).ok_or(RsError::Uncorrectable)?;
        if magnitudes.iter().any(|&e| e == 0) {
            // A located error with zero magnitude contradicts the locator
            return Err(RsError::Uncorrectable);
        }
        for (&pos, &e) in positions.iter().zip(&magnitudes) {
            block[pos] ^= e;
        }

        // The corrected word must be a codeword again; anything else means
        // the channel exceeded the code's capacity.
        let recheck = syndromes(block, self.params.parity_length());
        if recheck.iter().any(|&s| s != 0) {
            return Err(RsError::Uncorrectable);
        }

        debug!(
            "RS decode: corrected {} symbol error(s) at {:?}",
            positions.len(),
            positions
        );
        Ok(positions.len())
    }

    /// Decode a received block back to its information bytes.
    ///
    /// Trailing zero bytes of the systematic portion are treated as encode
    /// padding and stripped; a payload that legitimately ends in zero bytes
    /// comes back truncated. This convention is inherited from the deployed
    /// system and callers relying on trailing zeros must frame lengths
    /// themselves.
    pub fn decode(&self, block: &[u8]) -> Result<Vec<u8>, RsError> {
        let mut work = block.to_vec();
        self.correct(&mut work)?;

        let k = self.params.data_length();
        let data = &work[..k];
        let len = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        if len < k {
            debug!("RS decode: stripped {} trailing zero byte(s)", k - len);
        }
        Ok(data[..len].to_vec())
    }
}

/// One-shot encode with explicit parameters
pub fn rs_encode(data: &[u8], params: RsParameters) -> Result<Vec<u8>, RsError> {
    ReedSolomonCodec::new(params).encode(data)
}

/// One-shot decode with explicit parameters
pub fn rs_decode(block: &[u8], params: RsParameters) -> Result<Vec<u8>, RsError> {
    ReedSolomonCodec::new(params).decode(block)
}

/// Syndromes `S_j = r(α^j)` for `j = 0 .. count - 1`
fn syndromes(block: &[u8], count: usize) -> Poly {
    let gf = galois_field();
    (0..count)
        .map(|j| poly_eval(block, gf.alpha_pow(j as u32)))
        .collect()
}

/// Solve `A · x = b` over GF(2^8) by Gauss-Jordan elimination.
///
/// Returns `None` when the matrix is singular.
fn solve_linear(mut a: Vec<Vec<u8>>, mut b: Vec<u8>) -> Option<Vec<u8>> {
    let gf = galois_field();
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n).find(|&r| a[r][col] != 0)?;
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let inv = match gf.inverse(a[col][col]) {
            Ok(v) => v,
            Err(_) => return None,
        };
        for v in a[col].iter_mut() {
            *v = gf.mul(*v, inv);
        }
        b[col] = gf.mul(b[col], inv);

        let pivot = a[col].clone();
        let pivot_b = b[col];
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0 {
                continue;
            }
            for (dst, &src) in a[row].iter_mut().zip(&pivot) {
                *dst ^= gf.mul(factor, src);
            }
            b[row] ^= gf.mul(factor, pivot_b);
        }
    }

    Some(b)
}

/// Find the error locator coefficients `λ_1 .. λ_v` from the syndromes.
///
/// Solves the key equation `Σ λ_i · S_{j+v-i} = S_{j+v}` for the largest
/// `v <= t` whose syndrome matrix is nonsingular.
fn find_error_locator(synd: &[u8], t: usize) -> Option<Vec<u8>> {
    for v in (1..=t).rev() {
        let a: Vec<Vec<u8>> = (0..v)
            .map(|j| (0..v).map(|c| synd[j + v - 1 - c]).collect())
            .collect();
        let b: Vec<u8> = (0..v).map(|j| synd[j + v]).collect();
        if let Some(lambda) = solve_linear(a, b) {
            return Some(lambda);
        }
    }
    None
}

/// Evaluate `Λ(x) = 1 + Σ λ_i x^i` at the inverse locator of every block
/// position; the roots mark the error positions.
fn chien_search(lambda: &[u8], n: usize) -> Vec<usize> {
    let gf = galois_field();
    let mut positions = Vec::new();
    for pos in 0..n {
        // Symbol at index `pos` has locator X = α^(n-1-pos)
        let exp = (n - 1 - pos) as u32;
        let x_inv = gf.alpha_pow(GROUP_ORDER as u32 - exp);
        let mut acc = 1u8;
        let mut xpow = 1u8;
        for &li in lambda {
            xpow = gf.mul(xpow, x_inv);
            acc ^= gf.mul(li, xpow);
        }
        if acc == 0 {
            positions.push(pos);
        }
    }
    positions
}

/// Solve the Vandermonde system `Σ e_c · X_c^j = S_j` (j = 0 .. v-1) for the
/// error magnitudes.
fn solve_magnitudes(synd: &[u8], positions: &[usize], n: usize) -> Option<Vec<u8>> {
    let gf = galois_field();
    let v = positions.len();
    let a: Vec<Vec<u8>> = (0..v)
        .map(|j| {
            positions
                .iter()
                .map(|&p| gf.alpha_pow(((n - 1 - p) * j) as u32))
                .collect()
        })
        .collect();
    let b: Vec<u8> = synd[..v].to_vec();
    solve_linear(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galois::gf_alpha_pow;

    fn codec(n: u16, k: u16) -> ReedSolomonCodec {
        ReedSolomonCodec::new(RsParameters::try_new(n, k).unwrap())
    }

    #[test]
    fn test_encode_produces_codeword() {
        // Every encoded block must evaluate to zero at each generator root
        let codec = codec(31, 15);
        let block = codec.encode(b"Link16 payload").unwrap();
        assert_eq!(block.len(), 31);
        assert_eq!(&block[..14], b"Link16 payload");
        assert_eq!(block[14], 0); // zero padding up to data_length

        for i in 0..16 {
            assert_eq!(poly_eval(&block, gf_alpha_pow(i)), 0, "root α^{}", i);
        }
    }

    #[test]
    fn test_encode_rejects_long_input() {
        let codec = codec(31, 15);
        let err = codec.encode(&[1u8; 16]).unwrap_err();
        assert_eq!(
            err,
            RsError::InputTooLong {
                len: 16,
                data_length: 15
            }
        );
    }

    #[test]
    fn test_decode_clean_block() {
        let codec = codec(31, 15);
        let block = codec.encode(b"hello").unwrap();
        assert_eq!(codec.decode(&block).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let codec = codec(31, 15);
        let err = codec.decode(&[0u8; 30]).unwrap_err();
        assert_eq!(
            err,
            RsError::BlockLengthMismatch {
                len: 30,
                code_length: 31
            }
        );
    }

    #[test]
    fn test_single_error_corrected() {
        let codec = codec(31, 15);
        let block = codec.encode(b"single error").unwrap();

        for pos in [0usize, 7, 14, 15, 30] {
            let mut corrupted = block.clone();
            corrupted[pos] ^= 0x5A;
            let mut work = corrupted.clone();
            assert_eq!(codec.correct(&mut work).unwrap(), 1, "position {}", pos);
            assert_eq!(work, block);
        }
    }

    #[test]
    fn test_errors_up_to_capacity_corrected() {
        let codec = codec(31, 15);
        let block = codec.encode(b"capacity test").unwrap();

        // t = 8 for RS(31, 15); corrupt exactly t distinct symbols
        let mut corrupted = block.clone();
        for (i, pos) in [1usize, 4, 9, 12, 17, 22, 26, 30].iter().enumerate() {
            corrupted[*pos] ^= (i as u8) + 1;
        }
        assert_eq!(codec.decode(&corrupted).unwrap(), b"capacity test");
    }

    #[test]
    fn test_beyond_capacity_never_silently_wrong() {
        let codec = codec(15, 9);
        let payload = b"overload";
        let block = codec.encode(payload).unwrap();

        // t = 3; corrupt t + 1 symbols. The decoder may miscorrect to some
        // other codeword, but it must either error out or return a payload -
        // never panic.
        let mut corrupted = block.clone();
        for pos in [0usize, 3, 6, 9] {
            corrupted[pos] ^= 0xFF;
        }
        match codec.decode(&corrupted) {
            Ok(_) => {} // a miscorrection to some other codeword is permitted
            Err(RsError::Uncorrectable) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_padding_stripped() {
        let codec = codec(31, 15);
        let block = codec.encode(b"pad").unwrap();
        // Decode returns only the 3 payload bytes, not the 12 padding zeros
        assert_eq!(codec.decode(&block).unwrap(), b"pad");
    }

    #[test]
    fn test_trailing_zero_payload_is_truncated() {
        // The documented lossy convention: a payload ending in 0x00 loses
        // its trailing zeros on decode.
        let codec = codec(31, 15);
        let block = codec.encode(&[1, 2, 3, 0, 0]).unwrap();
        assert_eq!(codec.decode(&block).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_payload_round_trip() {
        let codec = codec(31, 15);
        let block = codec.encode(b"").unwrap();
        assert!(block[..15].iter().all(|&b| b == 0));
        // Parity of the zero polynomial is zero; the whole block is zero
        assert!(block.iter().all(|&b| b == 0));
        assert_eq!(codec.decode(&block).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_one_shot_helpers() {
        let params = RsParameters::DEFAULT;
        let block = rs_encode(b"helper", params).unwrap();
        assert_eq!(rs_decode(&block, params).unwrap(), b"helper");
    }
}
