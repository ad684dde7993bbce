//! Galois Field GF(2^8) arithmetic for Link16 Reed-Solomon operations
//!
//! This module implements 8-bit Galois Field arithmetic using the primitive
//! polynomial 0x11D (x⁸ + x⁴ + x³ + x² + 1), the field the Link16 coding
//! layer runs its Reed-Solomon symbols in. One symbol = one byte.

use thiserror::Error;

/// Link16 RS coding uses GF(2^8) with primitive polynomial 0x11D
const GF_GENERATOR: u16 = 0x11D;

/// Number of field elements
pub const FIELD_SIZE: usize = 256;

/// Multiplicative group order (2^8 - 1)
pub const GROUP_ORDER: usize = 255;

/// Field-domain violations. These are caller errors, never corrected or
/// retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Division (or inversion) by the zero element is undefined in a field
    #[error("division by zero in GF(2^8)")]
    DivisionByZero,
}

/// Precomputed multiplication and division tables for performance
pub struct GaloisField256 {
    log_table: [u8; FIELD_SIZE],
    exp_table: [u8; 2 * FIELD_SIZE], // 2x size to avoid modulo in calculations
}

impl GaloisField256 {
    /// Create a new Galois Field with precomputed tables
    pub fn new() -> Self {
        let mut gf = GaloisField256 {
            log_table: [0; FIELD_SIZE],
            exp_table: [0; 2 * FIELD_SIZE],
        };
        gf.build_tables();
        gf
    }

    /// Build logarithm and exponential tables for fast multiplication/division
    fn build_tables(&mut self) {
        let mut value = 1u16;

        // Build the exponential table first
        for i in 0..GROUP_ORDER {
            self.exp_table[i] = value as u8;
            self.log_table[value as usize] = i as u8;

            value <<= 1;
            if value & 0x100 != 0 {
                value ^= GF_GENERATOR;
            }
        }

        // Duplicate the table so log(a) + log(b) indexes without a modulo
        for i in GROUP_ORDER..2 * FIELD_SIZE {
            self.exp_table[i] = self.exp_table[i - GROUP_ORDER];
        }

        self.log_table[0] = 0; // log(0) is undefined; guarded in mul/div
    }

    /// Add two elements in GF(2^8) - this is just XOR
    #[inline]
    pub fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Subtract two elements in GF(2^8) - same as addition (XOR)
    #[inline]
    pub fn sub(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Multiply two elements in GF(2^8)
    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }

        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;
        self.exp_table[log_a + log_b]
    }

    /// Divide two elements in GF(2^8)
    ///
    /// Division by zero is undefined in the field and is rejected, including
    /// `0 / 0`.
    #[inline]
    pub fn div(&self, a: u8, b: u8) -> Result<u8, DomainError> {
        if b == 0 {
            return Err(DomainError::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }

        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;

        // Subtraction in log space, with wraparound
        let log_result = if log_a >= log_b {
            log_a - log_b
        } else {
            log_a + GROUP_ORDER - log_b
        };

        Ok(self.exp_table[log_result])
    }

    /// Raise an element to a power in GF(2^8)
    #[inline]
    pub fn pow(&self, base: u8, exponent: u32) -> u8 {
        if base == 0 {
            return if exponent == 0 { 1 } else { 0 };
        }
        if exponent == 0 {
            return 1;
        }

        let log_base = self.log_table[base as usize] as u64;
        let log_result = (log_base * exponent as u64) % GROUP_ORDER as u64;
        self.exp_table[log_result as usize]
    }

    /// Get the multiplicative inverse of an element
    #[inline]
    pub fn inverse(&self, a: u8) -> Result<u8, DomainError> {
        if a == 0 {
            return Err(DomainError::DivisionByZero);
        }

        let log_a = self.log_table[a as usize] as usize;
        Ok(self.exp_table[GROUP_ORDER - log_a])
    }

    /// α^exponent for the field generator α = 2
    #[inline]
    pub fn alpha_pow(&self, exponent: u32) -> u8 {
        self.exp_table[(exponent as usize) % GROUP_ORDER]
    }
}

impl Default for GaloisField256 {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::OnceLock;

/// Shared Galois Field tables. Immutable after construction, so sharing one
/// table across threads is safe; this is a lookup table, not hidden state.
static GALOIS_FIELD: OnceLock<GaloisField256> = OnceLock::new();

/// Get the shared Galois Field instance
pub fn galois_field() -> &'static GaloisField256 {
    GALOIS_FIELD.get_or_init(GaloisField256::new)
}

/// Convenience functions using the shared Galois Field
#[inline]
pub fn gf_add(a: u8, b: u8) -> u8 {
    galois_field().add(a, b)
}

#[inline]
pub fn gf_sub(a: u8, b: u8) -> u8 {
    galois_field().sub(a, b)
}

#[inline]
pub fn gf_mul(a: u8, b: u8) -> u8 {
    galois_field().mul(a, b)
}

#[inline]
pub fn gf_div(a: u8, b: u8) -> Result<u8, DomainError> {
    galois_field().div(a, b)
}

#[inline]
pub fn gf_pow(base: u8, exponent: u32) -> u8 {
    galois_field().pow(base, exponent)
}

#[inline]
pub fn gf_inverse(a: u8) -> Result<u8, DomainError> {
    galois_field().inverse(a)
}

#[inline]
pub fn gf_alpha_pow(exponent: u32) -> u8 {
    galois_field().alpha_pow(exponent)
}
