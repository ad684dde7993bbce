//! Coding layer for a Link16-style tactical data link
//!
//! The reversible transform pipeline between a logical protocol message and
//! a transmittable, integrity-protected, error-resilient bitstream:
//!
//! ```text
//! encode:  payload -> BIP tag -> RS(n, k) encode -> AES encrypt (iff keyed) -> interleave
//! decode:  deinterleave -> AES decrypt (iff keyed) -> RS decode -> BIP check
//! ```
//!
//! The protocol layer hands [`CodingPipeline::encode`] an already-serialized
//! byte payload and the physical layer modulates the result; both directions
//! are byte-in/byte-out with no framing beyond the RS block structure. The
//! four primitives ([`galois`], [`reed_solomon`], [`integrity`], [`cipher`],
//! [`interleave`]) are pure, stateless-per-call transforms and are safe to
//! call concurrently; the pipeline owns the only mutable configuration.

pub mod checksum;
pub mod cipher;
pub mod domain;
pub mod galois;
pub mod integrity;
pub mod interleave;
pub mod pipeline;
pub mod reed_solomon;

pub use cipher::CipherError;
pub use domain::{
    CipherKey, IntegrityTag, InterleaverShape, KeySize, ParameterError, RsParameters, ShapeError,
};
pub use galois::DomainError;
pub use integrity::IntegrityError;
pub use pipeline::{CodingPipeline, DecodeOutcome, PipelineConfig, PipelineError};
pub use reed_solomon::{ReedSolomonCodec, RsError};
