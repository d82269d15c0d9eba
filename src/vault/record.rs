//! Records stored in the vault.
//!
//! A `ServiceRecord` is produced only by `VaultStore::scan_all`.  Its
//! decrypted codes start out empty and are attached afterwards with
//! `with_decrypted`; they are never written back to the database.

use chrono::{DateTime, Utc};

/// Authenticated ciphertext of one service's backup codes
/// (nonce || ciphertext || tag).
///
/// Only the cipher engine and the store's row mapping can create one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload(Vec<u8>);

impl EncryptedPayload {
    pub(crate) fn from_sealed(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One entry in the vault.
#[derive(Debug, Clone)]
pub struct ServiceRecord {
    id: i64,
    service_name: String,
    description: Option<String>,
    encrypted_payload: EncryptedPayload,
    decrypted_payload: String,
    date_added: DateTime<Utc>,
}

impl ServiceRecord {
    pub(crate) fn from_row(
        id: i64,
        service_name: String,
        description: Option<String>,
        encrypted_payload: EncryptedPayload,
        date_added: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            service_name,
            description,
            encrypted_payload,
            decrypted_payload: String::new(),
            date_added,
        }
    }

    /// Attach the decrypted backup codes (in memory only).
    #[must_use]
    pub fn with_decrypted(self, decrypted_payload: String) -> Self {
        Self {
            decrypted_payload,
            ..self
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn encrypted_payload(&self) -> &EncryptedPayload {
        &self.encrypted_payload
    }

    /// Decrypted codes; empty until `with_decrypted` has been applied.
    pub fn decrypted_payload(&self) -> &str {
        &self.decrypted_payload
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }
}
