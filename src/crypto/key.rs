//! The vault key.
//!
//! A vault is protected by a single random 256-bit key.  The key is shown
//! to the operator once, as URL-safe base64 text (44 characters with
//! padding), and must be typed back in on every later invocation.  It is
//! never written to disk by this program.

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, TwoFaError};

/// Length of the raw key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte vault key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct CipherKey {
    bytes: [u8; KEY_LEN],
}

impl CipherKey {
    /// Create a key from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh key from the OS random number generator.
    pub fn generate() -> Self {
        let mut generated = Aes256Gcm::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(generated.as_slice());
        generated.as_mut_slice().zeroize();
        Self { bytes }
    }

    /// Parse a key from its text form.
    ///
    /// Leading and trailing whitespace is ignored.  Anything that is not
    /// URL-safe base64 of exactly 32 bytes is `InvalidKey`.
    pub fn parse(text: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            URL_SAFE
                .decode(text.trim().as_bytes())
                .map_err(|_| TwoFaError::InvalidKey)?,
        );

        if decoded.len() != KEY_LEN {
            return Err(TwoFaError::InvalidKey);
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self { bytes })
    }

    /// Text form of the key, as shown to the operator.
    pub fn encode(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.bytes))
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(..)")
    }
}
