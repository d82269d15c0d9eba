//! `CipherEngine` binds one vault key for the duration of an invocation.
//!
//! There is no "unkeyed" engine value: the only ways to obtain a
//! `CipherEngine` are `acquire` (which runs key acquisition against the
//! operator) and `from_key`.  Encrypting or decrypting before a key is
//! bound is therefore impossible to express.

use zeroize::Zeroizing;

use super::encryption;
use super::key::CipherKey;
use super::legacy;
use crate::errors::{Result, TwoFaError};
use crate::vault::EncryptedPayload;

/// Operator-facing side of key acquisition.
///
/// The terminal implementation lives in `cli::keys`; tests supply their own.
pub trait KeyProvider {
    /// Show a freshly generated key to the operator.  Called at most once,
    /// and only when the vault is empty.
    fn announce_new_key(&mut self, encoded_key: &str) -> Result<()>;

    /// Ask the operator for the existing vault key.
    fn request_key(&mut self) -> Result<Zeroizing<String>>;
}

/// Holds a validated vault key and performs authenticated encryption with it.
#[derive(Debug)]
pub struct CipherEngine {
    key: CipherKey,
}

impl CipherEngine {
    /// Run key acquisition.
    ///
    /// With `record_count == 0` a new key is generated and announced;
    /// otherwise the existing key is requested from the operator.  Either
    /// way the key text is validated before use, failing with `InvalidKey`.
    pub fn acquire(record_count: u64, keys: &mut dyn KeyProvider) -> Result<Self> {
        let key_text = if record_count == 0 {
            let encoded = CipherKey::generate().encode();
            keys.announce_new_key(&encoded)?;
            encoded
        } else {
            keys.request_key()?
        };

        let key = CipherKey::parse(&key_text)?;
        Ok(Self { key })
    }

    /// Build an engine around a key that is already in hand.
    pub fn from_key(key: CipherKey) -> Self {
        Self { key }
    }

    /// Encrypt `cleartext` into a payload ready for the vault store.
    pub fn encrypt(&self, cleartext: &[u8]) -> Result<EncryptedPayload> {
        let sealed = encryption::encrypt(self.key.as_bytes(), cleartext)?;
        Ok(EncryptedPayload::from_sealed(sealed))
    }

    /// Decrypt a stored payload.
    ///
    /// Entries written by the Python releases are read as Fernet tokens.
    /// Fails with `AuthenticationFailure` for a wrong key or tampered data.
    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<Zeroizing<Vec<u8>>> {
        let stored = payload.as_bytes();
        let clear = match legacy::decode_token(stored) {
            Some(token) => legacy::decrypt(self.key.as_bytes(), &token)?,
            None => encryption::decrypt(self.key.as_bytes(), stored)?,
        };
        Ok(Zeroizing::new(clear))
    }

    /// Decrypt a stored payload that is expected to hold UTF-8 text.
    ///
    /// `label` names the entry in the error if the authenticated bytes are
    /// not valid UTF-8.
    pub fn decrypt_text(&self, payload: &EncryptedPayload, label: &str) -> Result<String> {
        let clear = self.decrypt(payload)?;
        String::from_utf8(clear.to_vec()).map_err(|_| TwoFaError::CorruptRecord(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which side of key acquisition was used.
    #[derive(Default)]
    struct ScriptedKeys {
        supplied: Option<String>,
        announced: Vec<String>,
        requests: usize,
    }

    impl KeyProvider for ScriptedKeys {
        fn announce_new_key(&mut self, encoded_key: &str) -> Result<()> {
            self.announced.push(encoded_key.to_string());
            Ok(())
        }

        fn request_key(&mut self) -> Result<Zeroizing<String>> {
            self.requests += 1;
            Ok(Zeroizing::new(self.supplied.clone().unwrap_or_default()))
        }
    }

    #[test]
    fn empty_vault_generates_and_announces_key() {
        let mut keys = ScriptedKeys::default();
        let engine = CipherEngine::acquire(0, &mut keys).unwrap();

        assert_eq!(keys.announced.len(), 1);
        assert_eq!(keys.requests, 0);
        assert_eq!(
            engine.key.encode().as_str(),
            keys.announced[0].as_str(),
            "the announced key must be the key in use"
        );
    }

    #[test]
    fn non_empty_vault_requests_key() {
        let known = CipherKey::generate();
        let mut keys = ScriptedKeys {
            supplied: Some(known.encode().to_string()),
            ..Default::default()
        };
        let engine = CipherEngine::acquire(3, &mut keys).unwrap();

        assert!(keys.announced.is_empty());
        assert_eq!(keys.requests, 1);
        assert_eq!(engine.key.as_bytes(), known.as_bytes());
    }

    #[test]
    fn malformed_supplied_key_is_invalid_key() {
        let mut keys = ScriptedKeys {
            supplied: Some("hunter2".into()),
            ..Default::default()
        };
        let result = CipherEngine::acquire(1, &mut keys);
        assert!(matches!(result, Err(TwoFaError::InvalidKey)));
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let engine = CipherEngine::from_key(CipherKey::generate());
        let payload = engine.encrypt(b"111111\n222222").unwrap();
        let original = payload.as_bytes().to_vec();

        for byte in 0..original.len() {
            for bit in 0..8 {
                let mut tampered = original.clone();
                tampered[byte] ^= 1 << bit;
                let result = engine.decrypt(&EncryptedPayload::from_sealed(tampered));
                assert!(
                    matches!(result, Err(TwoFaError::AuthenticationFailure)),
                    "flip of byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    #[test]
    fn reads_entries_from_python_releases() {
        let key = CipherKey::generate();
        let stored = legacy::tests::seal(key.as_bytes(), [3u8; 16], 1_709_284_542, b"111111");
        let engine = CipherEngine::from_key(key);

        let payload = EncryptedPayload::from_sealed(stored);
        assert_eq!(engine.decrypt_text(&payload, "github").unwrap(), "111111");
    }

    #[test]
    fn python_release_entry_with_wrong_key_fails() {
        let stored = legacy::tests::seal(&[0x31u8; 32], [3u8; 16], 0, b"111111");
        let engine = CipherEngine::from_key(CipherKey::generate());

        let result = engine.decrypt(&EncryptedPayload::from_sealed(stored));
        assert!(matches!(result, Err(TwoFaError::AuthenticationFailure)));
    }

    #[test]
    fn truncated_payload_is_authentication_failure() {
        let engine = CipherEngine::from_key(CipherKey::generate());
        let payload = engine.encrypt(b"abc").unwrap();
        let mut bytes = payload.as_bytes().to_vec();
        bytes.pop();
        let result = engine.decrypt(&EncryptedPayload::from_sealed(bytes));
        assert!(matches!(result, Err(TwoFaError::AuthenticationFailure)));
    }

    #[test]
    fn non_utf8_cleartext_is_reported_as_corrupt() {
        let engine = CipherEngine::from_key(CipherKey::generate());
        let payload = engine.encrypt(&[0xFF, 0xFE, 0xFD]).unwrap();
        let result = engine.decrypt_text(&payload, "github");
        assert!(matches!(result, Err(TwoFaError::CorruptRecord(name)) if name == "github"));
    }
}
