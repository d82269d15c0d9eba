//! The two vault workflows: add one service, or decrypt every service.
//!
//! Both consult the store's record count first to decide how the key is
//! obtained (generated for an empty vault, requested otherwise), then hand
//! data between `VaultStore` and `CipherEngine`.

use log::debug;

use super::record::ServiceRecord;
use super::store::VaultStore;
use crate::crypto::{CipherEngine, KeyProvider};
use crate::errors::{Result, TwoFaError};

/// Encrypt `cleartext` and store it under `service_name`.  Returns the new id.
///
/// The service name is stored exactly as given; a name with leading or
/// trailing whitespace is rejected rather than silently renamed.
///
/// When the vault already holds records, the operator's key is checked
/// against the oldest stored payload before anything is written, so a
/// mistyped key is rejected instead of producing an entry no other key can
/// open.
pub fn add_service(
    store: &mut VaultStore,
    keys: &mut dyn KeyProvider,
    service_name: &str,
    description: Option<&str>,
    cleartext: &str,
) -> Result<i64> {
    if service_name.trim().is_empty() {
        return Err(TwoFaError::InvalidInput(
            "service name cannot be empty".into(),
        ));
    }
    if service_name.trim() != service_name {
        return Err(TwoFaError::InvalidInput(format!(
            "service name '{service_name}' has leading or trailing whitespace"
        )));
    }
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    let count = store.count()?;
    debug!("vault holds {count} record(s) before add");
    let engine = CipherEngine::acquire(count, keys)?;

    if count > 0 {
        if let Some(oldest) = store.oldest_payload()? {
            engine.decrypt(&oldest)?;
        }
    }

    let payload = engine.encrypt(cleartext.trim().as_bytes())?;
    store.insert(service_name, description, &payload)
}

/// Decrypt every stored record, in insertion order.
///
/// An empty vault is `EmptyVault` and no key is asked for.  The first
/// record that fails to decrypt aborts the whole listing.
pub fn decrypt_all(store: &VaultStore, keys: &mut dyn KeyProvider) -> Result<Vec<ServiceRecord>> {
    let count = store.count()?;
    if count == 0 {
        return Err(TwoFaError::EmptyVault);
    }

    let engine = CipherEngine::acquire(count, keys)?;

    store
        .scan_all()?
        .into_iter()
        .map(|record| {
            let codes = engine.decrypt_text(record.encrypted_payload(), record.service_name())?;
            Ok(record.with_decrypted(codes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CipherKey;
    use zeroize::Zeroizing;

    struct FixedKey(String);

    impl KeyProvider for FixedKey {
        fn announce_new_key(&mut self, encoded_key: &str) -> Result<()> {
            self.0 = encoded_key.to_string();
            Ok(())
        }

        fn request_key(&mut self) -> Result<Zeroizing<String>> {
            Ok(Zeroizing::new(self.0.clone()))
        }
    }

    #[test]
    fn add_is_not_blocked_by_a_row_without_codes() {
        let mut store = VaultStore::open_in_memory().unwrap();
        let mut keys = FixedKey(String::new());
        add_service(&mut store, &mut keys, "github", None, "111111").unwrap();

        store
            .connection()
            .execute(
                "INSERT INTO servicecodes (service_name, date_added) VALUES ('broken', '2024-03-01 09:15:42')",
                [],
            )
            .unwrap();

        add_service(&mut store, &mut keys, "gitlab", None, "222222").unwrap();
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn key_check_uses_oldest_entry() {
        let mut store = VaultStore::open_in_memory().unwrap();
        let mut keys = FixedKey(String::new());
        add_service(&mut store, &mut keys, "github", None, "111111").unwrap();

        let mut wrong = FixedKey(CipherKey::generate().encode().to_string());
        let result = add_service(&mut store, &mut wrong, "gitlab", None, "222222");
        assert!(matches!(result, Err(TwoFaError::AuthenticationFailure)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn name_with_surrounding_whitespace_is_rejected() {
        let mut store = VaultStore::open_in_memory().unwrap();
        let mut keys = FixedKey(String::new());

        for name in [" github", "github ", "\tgithub"] {
            let result = add_service(&mut store, &mut keys, name, None, "111111");
            assert!(matches!(result, Err(TwoFaError::InvalidInput(_))), "{name:?}");
        }
        assert_eq!(store.count().unwrap(), 0);
        assert!(keys.0.is_empty(), "no key is generated for rejected input");
    }
}
