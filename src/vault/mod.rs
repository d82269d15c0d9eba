//! Vault module: encrypted 2FA backup code storage.
//!
//! This module provides:
//! - `ServiceRecord` and `EncryptedPayload` types (`record`)
//! - The SQLite-backed `VaultStore` (`store`)
//! - The add / decrypt-all workflows that sequence store and cipher (`ops`)

pub mod ops;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use ops::{add_service, decrypt_all};
pub use record::{EncryptedPayload, ServiceRecord};
pub use store::VaultStore;
