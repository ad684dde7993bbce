//! The coding pipeline orchestrator
//!
//! Composes the four coding primitives into the fixed transform order of the
//! waveform:
//!
//! ```text
//! encode:  payload -> BIP tag -> RS encode -> AES encrypt (iff keyed) -> interleave
//! decode:  deinterleave -> AES decrypt (iff keyed) -> RS decode -> BIP check
//! ```
//!
//! Each [`CodingPipeline`] owns its configuration; there is no process-wide
//! instance, so independent pipelines (per channel, per test) coexist
//! freely. Setters take `&mut self` and `encode`/`decode` take `&self`:
//! configure-once-then-share is safe across threads without locks, and
//! runtime reconfiguration under concurrency needs an external `RwLock` by
//! construction.
//!
//! Stage failures are all-or-nothing per call; nothing retries internally.
//! A BIP mismatch after a structurally successful decode is deliberately a
//! warning-level outcome, not an error: the tactical message may still be
//! usable with acknowledged corruption risk, and downstream consumers decide.

use crate::cipher::{self, CipherError};
use crate::domain::{CipherKey, InterleaverShape, RsParameters};
use crate::integrity;
use crate::interleave;
use crate::reed_solomon::{ReedSolomonCodec, RsError};
use log::{debug, warn};
use thiserror::Error;

/// Aggregated failure modes of a pipeline call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Reed-Solomon stage failure (oversized input, uncorrectable block)
    #[error("Reed-Solomon stage: {0}")]
    Rs(#[from] RsError),

    /// Cipher stage failure (malformed ciphertext length)
    #[error("cipher stage: {0}")]
    Cipher(#[from] CipherError),

    /// Received stream too short to contain the configured block structure
    #[error("received stream carries {len} stage bytes, expected {expected}")]
    TruncatedStream { len: usize, expected: usize },
}

/// Result of a structurally successful decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Payload recovered and its BIP tag verified
    Verified(Vec<u8>),
    /// Payload recovered but its BIP tag does not match; returned anyway
    /// under the waveform's lenient integrity policy
    IntegrityWarning(Vec<u8>),
}

impl DecodeOutcome {
    pub fn payload(&self) -> &[u8] {
        match self {
            DecodeOutcome::Verified(p) | DecodeOutcome::IntegrityWarning(p) => p,
        }
    }

    pub fn into_payload(self) -> Vec<u8> {
        match self {
            DecodeOutcome::Verified(p) | DecodeOutcome::IntegrityWarning(p) => p,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, DecodeOutcome::Verified(_))
    }
}

/// Per-pipeline configuration: RS parameters, interleaver shape, and the
/// optional cipher key
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    rs: RsParameters,
    shape: InterleaverShape,
    key: Option<CipherKey>,
}

impl PipelineConfig {
    pub fn new(rs: RsParameters, shape: InterleaverShape) -> Self {
        PipelineConfig {
            rs,
            shape,
            key: None,
        }
    }

    /// Attach a cipher key, enabling the encrypt/decrypt stage
    pub fn with_key(mut self, key: CipherKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn rs_parameters(&self) -> RsParameters {
        self.rs
    }

    pub fn interleaver_shape(&self) -> InterleaverShape {
        self.shape
    }

    pub fn key(&self) -> Option<&CipherKey> {
        self.key.as_ref()
    }
}

/// The coding-layer orchestrator
pub struct CodingPipeline {
    config: PipelineConfig,
}

impl CodingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        CodingPipeline { config }
    }

    /// Pipeline with the default RS(31, 15) / 8x8 configuration and no key
    pub fn with_defaults() -> Self {
        CodingPipeline {
            config: PipelineConfig::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Set or clear the cipher key
    pub fn set_key(&mut self, key: Option<CipherKey>) {
        self.config.key = key;
    }

    pub fn set_rs_parameters(&mut self, params: RsParameters) {
        self.config.rs = params;
    }

    pub fn set_interleaver_shape(&mut self, shape: InterleaverShape) {
        self.config.shape = shape;
    }

    /// Largest payload a single encode call accepts: the RS data length
    /// minus the trailing BIP tag byte
    pub fn max_payload_len(&self) -> usize {
        self.config.rs.data_length() - 1
    }

    /// Run the forward pipeline. All-or-nothing: any stage failure fails the
    /// call and nothing is retried.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, PipelineError> {
        let tagged = integrity::append_tag(payload);
        if !payload.is_empty() && tagged[tagged.len() - 1] == 0 {
            // The zero-strip convention on decode cannot distinguish an
            // all-zero tag byte from RS padding; such payloads round-trip
            // truncated.
            warn!("payload BIP tag is 00000; decode-side zero stripping will drop it");
        }

        let block = ReedSolomonCodec::new(self.config.rs).encode(&tagged)?;

        let transported = match &self.config.key {
            Some(key) => cipher::encrypt(&block, key),
            None => block,
        };

        let stream = interleave::interleave(&transported, self.config.shape);
        debug!(
            "encode: {} payload bytes -> {} stream bytes ({}, {}, key: {})",
            payload.len(),
            stream.len(),
            self.config.rs,
            self.config.shape,
            self.config.key.is_some()
        );
        Ok(stream)
    }

    /// Run the inverse pipeline.
    ///
    /// RS failure is fatal for the call. A BIP mismatch on the recovered
    /// payload is returned as [`DecodeOutcome::IntegrityWarning`], never
    /// silently discarded and never escalated to an error.
    pub fn decode(&self, stream: &[u8]) -> Result<DecodeOutcome, PipelineError> {
        let deinterleaved = interleave::deinterleave(stream, self.config.shape);

        // The interleaver zero-fills up to its matrix size; recover the true
        // stage length from the configuration.
        let n = self.config.rs.code_length();
        let expected = match &self.config.key {
            Some(_) => cipher::padded_len(n),
            None => n,
        };
        if deinterleaved.len() < expected {
            return Err(PipelineError::TruncatedStream {
                len: deinterleaved.len(),
                expected,
            });
        }
        let stage = &deinterleaved[..expected];

        let block = match &self.config.key {
            Some(key) => {
                let mut decrypted = cipher::decrypt(stage, key)?;
                match decrypted.len() {
                    len if len > n => {
                        // Lenient unpad kept an inconsistent pad in place
                        decrypted.truncate(n);
                        decrypted
                    }
                    len if len < n => {
                        return Err(PipelineError::TruncatedStream { len, expected: n });
                    }
                    _ => decrypted,
                }
            }
            None => stage.to_vec(),
        };

        let data = ReedSolomonCodec::new(self.config.rs).decode(&block)?;
        let (payload, tag) = integrity::split_tag(&data);

        if integrity::verify(payload, tag) {
            Ok(DecodeOutcome::Verified(payload.to_vec()))
        } else {
            warn!(
                "BIP mismatch after RS decode (expected {}, received {}); \
                 returning payload with integrity warning",
                integrity::calculate(payload),
                tag
            );
            Ok(DecodeOutcome::IntegrityWarning(payload.to_vec()))
        }
    }
}

impl Default for CodingPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}
