//! Read-only support for entries written by the Python releases.
//!
//! Those releases stored each entry as a URL-safe base64 Fernet token:
//!
//! ```text
//! 0x80 | timestamp (8) | IV (16) | AES-128-CBC ciphertext | HMAC-SHA256 (32)
//! ```
//!
//! The 32-byte vault key splits into a 16-byte signing key followed by a
//! 16-byte encryption key, so the key an existing user already has opens
//! both old and new entries.  New entries are always AES-256-GCM.

use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::key::KEY_LEN;
use crate::errors::{Result, TwoFaError};

/// Leading byte of every Fernet token.
const VERSION: u8 = 0x80;

/// version + timestamp + IV
const HEADER_LEN: usize = 1 + 8 + 16;

const BLOCK_LEN: usize = 16;
const HMAC_LEN: usize = 32;

/// Decode a stored payload if it is a Fernet token; `None` otherwise.
pub fn decode_token(stored: &[u8]) -> Option<Vec<u8>> {
    let raw = URL_SAFE.decode(stored).ok()?;
    (raw.first() == Some(&VERSION) && raw.len() >= HEADER_LEN + BLOCK_LEN + HMAC_LEN)
        .then_some(raw)
}

/// Verify and decrypt a decoded Fernet token.
///
/// The HMAC is checked before any decryption; every failure is
/// `AuthenticationFailure`.  Token age is not checked.
pub fn decrypt(key: &[u8; KEY_LEN], token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < HEADER_LEN + BLOCK_LEN + HMAC_LEN || token[0] != VERSION {
        return Err(TwoFaError::AuthenticationFailure);
    }

    let (signing_key, encryption_key) = key.split_at(KEY_LEN / 2);
    let (signed, tag) = token.split_at(token.len() - HMAC_LEN);

    let mut mac = Hmac::<Sha256>::new_from_slice(signing_key)
        .map_err(|_| TwoFaError::AuthenticationFailure)?;
    mac.update(signed);
    mac.verify_slice(tag)
        .map_err(|_| TwoFaError::AuthenticationFailure)?;

    let iv = &signed[9..HEADER_LEN];
    let mut body = signed[HEADER_LEN..].to_vec();
    if body.len() % BLOCK_LEN != 0 {
        return Err(TwoFaError::AuthenticationFailure);
    }

    let clear_len = cbc::Decryptor::<Aes128>::new_from_slices(encryption_key, iv)
        .map_err(|_| TwoFaError::AuthenticationFailure)?
        .decrypt_padded_mut::<Pkcs7>(&mut body)
        .map_err(|_| TwoFaError::AuthenticationFailure)?
        .len();
    body.truncate(clear_len);
    Ok(body)
}
