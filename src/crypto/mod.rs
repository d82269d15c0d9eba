//! Cryptographic primitives for twofabackup.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption of raw bytes (`encryption`)
//! - The vault key type, its generation and text encoding (`key`)
//! - Read-only decoding of tokens from the Python releases (`legacy`)
//! - `CipherEngine`, the per-invocation key holder used by the vault (`engine`)

pub mod encryption;
pub mod engine;
pub mod key;
pub mod legacy;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CipherEngine, CipherKey, KeyProvider};
pub use encryption::{decrypt, encrypt};
pub use engine::{CipherEngine, KeyProvider};
pub use key::{CipherKey, KEY_LEN};
