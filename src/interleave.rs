//! Matrix block interleaving
//!
//! Spreads burst errors across Reed-Solomon symbols: each `rows * cols`
//! block is written into a matrix row-major and read back out column-major.
//! A burst of adjacent channel errors then lands in distinct RS symbols,
//! which the code corrects far more easily than a contiguous run.
//!
//! The transform is stateless and shape-parameterized per call;
//! [`BlockInterleaver`] only carries the shape for callers that configure
//! once and reuse.

use crate::domain::InterleaverShape;
use log::warn;

/// Interleave `data`, zero-padding to a multiple of the matrix size.
///
/// Bytes are written row-major into a `rows x cols` matrix and read out
/// column-major, block by block.
pub fn interleave(data: &[u8], shape: InterleaverShape) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let rows = shape.rows();
    let cols = shape.cols();
    let block = shape.block_size();
    let num_blocks = data.len().div_ceil(block);
    let total = num_blocks * block;

    let mut padded = data.to_vec();
    padded.resize(total, 0);

    let mut out = vec![0u8; total];
    for m in 0..num_blocks {
        let base = m * block;
        for i in 0..rows {
            for j in 0..cols {
                out[base + j * rows + i] = padded[base + i * cols + j];
            }
        }
    }
    out
}

/// Invert [`interleave`]: write column-major, read row-major.
///
/// The input length should be a multiple of the matrix size; a trailing
/// partial block cannot have come from this interleaver and is dropped with
/// a warning, matching the source system.
pub fn deinterleave(data: &[u8], shape: InterleaverShape) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let rows = shape.rows();
    let cols = shape.cols();
    let block = shape.block_size();
    if data.len() % block != 0 {
        warn!(
            "deinterleave: {} bytes is not a multiple of the {} matrix ({} bytes); \
             trailing partial block dropped",
            data.len(),
            shape,
            block
        );
    }
    let num_blocks = data.len() / block;

    let mut out = vec![0u8; num_blocks * block];
    for m in 0..num_blocks {
        let base = m * block;
        for i in 0..rows {
            for j in 0..cols {
                out[base + i * cols + j] = data[base + j * rows + i];
            }
        }
    }
    out
}

/// A shape-carrying interleaver for configure-once call sites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInterleaver {
    shape: InterleaverShape,
}

impl BlockInterleaver {
    pub fn new(shape: InterleaverShape) -> Self {
        BlockInterleaver { shape }
    }

    pub fn shape(&self) -> InterleaverShape {
        self.shape
    }

    /// Reconfigure the matrix dimensions
    pub fn set_shape(&mut self, shape: InterleaverShape) {
        self.shape = shape;
    }

    pub fn interleave(&self, data: &[u8]) -> Vec<u8> {
        interleave(data, self.shape)
    }

    pub fn deinterleave(&self, data: &[u8]) -> Vec<u8> {
        deinterleave(data, self.shape)
    }
}

impl Default for BlockInterleaver {
    fn default() -> Self {
        BlockInterleaver::new(InterleaverShape::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: u16, cols: u16) -> InterleaverShape {
        InterleaverShape::try_new(rows, cols).unwrap()
    }

    #[test]
    fn test_single_block_permutation() {
        // 4x4 matrix: rows ABCD / EFGH / IJKL / MNOP, columns read top-down
        let out = interleave(b"ABCDEFGHIJKLMNOP", shape(4, 4));
        assert_eq!(out, b"AEIMBFJNCGKODHLP");
    }

    #[test]
    fn test_rectangular_block() {
        // 2x3 matrix: rows ABC / DEF, columns AD BE CF
        let out = interleave(b"ABCDEF", shape(2, 3));
        assert_eq!(out, b"ADBECF");
        assert_eq!(deinterleave(&out, shape(2, 3)), b"ABCDEF");
    }

    #[test]
    fn test_partial_block_zero_padded() {
        let out = interleave(b"AB", shape(2, 2));
        // Matrix: A B / 0 0 -> columns A 0 B 0
        assert_eq!(out, &[b'A', 0, b'B', 0]);
        assert_eq!(deinterleave(&out, shape(2, 2)), &[b'A', b'B', 0, 0]);
    }

    #[test]
    fn test_round_trip_equals_zero_padded_input() {
        let data: Vec<u8> = (0u8..=200).collect();
        for (rows, cols) in [(4, 4), (2, 7), (7, 2), (1, 16), (16, 1), (3, 5)] {
            let s = shape(rows, cols);
            let block = s.block_size();
            let mut expected = data.clone();
            expected.resize(data.len().div_ceil(block) * block, 0);
            assert_eq!(
                deinterleave(&interleave(&data, s), s),
                expected,
                "shape {}x{}",
                rows,
                cols
            );
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(interleave(b"", shape(4, 4)).is_empty());
        assert!(deinterleave(b"", shape(4, 4)).is_empty());
    }

    #[test]
    fn test_degenerate_single_cell() {
        // 1x1 matrix is the identity permutation
        let data = b"identity";
        assert_eq!(interleave(data, shape(1, 1)), data);
    }

    #[test]
    fn test_trailing_partial_block_dropped() {
        let out = deinterleave(&[1, 2, 3, 4, 5], shape(2, 2));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_block_interleaver_reconfigure() {
        let mut il = BlockInterleaver::default();
        assert_eq!(il.shape(), InterleaverShape::DEFAULT);

        il.set_shape(shape(4, 4));
        assert_eq!(il.interleave(b"ABCDEFGHIJKLMNOP"), b"AEIMBFJNCGKODHLP");
        assert_eq!(
            il.deinterleave(b"AEIMBFJNCGKODHLP"),
            b"ABCDEFGHIJKLMNOP"
        );
    }
}
