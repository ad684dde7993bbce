//! Reed-Solomon Error Correction Module
//!
//! This module provides Reed-Solomon encoding and decoding for the Link16
//! coding pipeline. Link16 message blocks use GF(2^8) — one symbol per byte —
//! with a systematic code built from sequential generator roots α⁰…α^(n−k−1),
//! matching the deployed waveform (generator polynomial index 0).
//!
//! ## Decoding
//!
//! Decode computes the 2t syndromes and, for a non-zero pattern, solves the
//! Peterson–Gorenstein–Zierler key equation by Gaussian elimination over the
//! field, locates error positions with a Chien search, and solves the
//! syndrome Vandermonde system for the error magnitudes. A post-correction
//! syndrome re-check guarantees a corrupted block is never returned as clean
//! data.

mod codec;
mod poly;

pub use codec::{rs_decode, rs_encode, ReedSolomonCodec, RsError};
pub use poly::{generator_poly, poly_eval, poly_mul};
