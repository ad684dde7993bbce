//! Symmetric cipher stage for the coding pipeline
//!
//! AES with a selectable key size (128/192/256 bits), applied per 16-byte
//! block with no IV and no chaining, exactly as the deployed waveform does.
//! Identical plaintext blocks therefore produce identical ciphertext blocks;
//! this leaks structure across blocks and is kept only for bit-compatibility
//! with fielded equipment. Do not reuse this stage where real
//! confidentiality is required.
//!
//! Padding is PKCS-style byte-value padding and is always appended: a
//! payload already aligned to the block size gains a full block of padding.
//! Decrypt strips padding leniently — an inconsistent pad is logged and the
//! full decrypted buffer returned, matching the source system's behavior.

use crate::domain::{CipherKey, KeySize};
use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use log::warn;
use thiserror::Error;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Cipher stage failures. Key-size violations are rejected earlier, at
/// [`CipherKey`] construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Ciphertext not a positive multiple of the cipher block size
    #[error("ciphertext length {0} is not a positive multiple of 16 bytes")]
    InvalidCiphertextLength(usize),
}

/// Key-size dispatch over the three AES variants
enum BlockCipher {
    Aes128(Box<Aes128>),
    Aes192(Box<Aes192>),
    Aes256(Box<Aes256>),
}

impl BlockCipher {
    fn new(key: &CipherKey) -> Self {
        // CipherKey material is always exactly the size's byte length
        match key.size() {
            KeySize::Bits128 => {
                BlockCipher::Aes128(Box::new(Aes128::new(GenericArray::from_slice(key.as_bytes()))))
            }
            KeySize::Bits192 => {
                BlockCipher::Aes192(Box::new(Aes192::new(GenericArray::from_slice(key.as_bytes()))))
            }
            KeySize::Bits256 => {
                BlockCipher::Aes256(Box::new(Aes256::new(GenericArray::from_slice(key.as_bytes()))))
            }
        }
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            BlockCipher::Aes128(c) => c.encrypt_block(block),
            BlockCipher::Aes192(c) => c.encrypt_block(block),
            BlockCipher::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            BlockCipher::Aes128(c) => c.decrypt_block(block),
            BlockCipher::Aes192(c) => c.decrypt_block(block),
            BlockCipher::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// Padded length of a plaintext: the next multiple of [`BLOCK_SIZE`]
/// strictly greater than `plaintext_len`.
///
/// The pipeline uses this to recover stage boundaries on decode.
pub fn padded_len(plaintext_len: usize) -> usize {
    plaintext_len + (BLOCK_SIZE - plaintext_len % BLOCK_SIZE)
}

/// Encrypt `plaintext` under `key`.
///
/// The output length is always `padded_len(plaintext.len())`.
pub fn encrypt(plaintext: &[u8], key: &CipherKey) -> Vec<u8> {
    let cipher = BlockCipher::new(key);

    let pad = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE; // 1..=16, never zero
    let mut buf = Vec::with_capacity(plaintext.len() + pad);
    buf.extend_from_slice(plaintext);
    buf.extend(std::iter::repeat(pad as u8).take(pad));

    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block(chunk);
    }
    buf
}

/// Decrypt `ciphertext` under `key` and strip the padding.
///
/// An inconsistent pad (value out of range, or trailing bytes that do not
/// all carry the pad value) is logged and left in place; the full decrypted
/// buffer is returned rather than an error.
pub fn decrypt(ciphertext: &[u8], key: &CipherKey) -> Result<Vec<u8>, CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidCiphertextLength(ciphertext.len()));
    }

    let cipher = BlockCipher::new(key);
    let mut buf = ciphertext.to_vec();
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block(chunk);
    }

    if let Some(&pad) = buf.last() {
        let pad_len = pad as usize;
        if (1..=BLOCK_SIZE).contains(&pad_len)
            && buf[buf.len() - pad_len..].iter().all(|&b| b == pad)
        {
            buf.truncate(buf.len() - pad_len);
        } else {
            warn!("inconsistent cipher padding (pad byte {pad:#04x}); returning unstripped buffer");
        }
    }
    Ok(buf)
}

/// Generate a fresh random key of the requested size
pub fn generate_random_key(size: KeySize) -> CipherKey {
    CipherKey::generate(size)
}
