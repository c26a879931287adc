// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-slot credential vault.
//!
//! Exactly one encrypted credential record lives at a fixed storage key.
//! No versioning, no multi-account support -- a deliberate scope limit of
//! the system, not an oversight.

use estateflow_config::model::VaultConfig;
use estateflow_core::{CredentialRecord, EstateError, KeyValueStore};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::envelope;

/// Fixed key the encrypted blob is stored under. Matches the legacy
/// dashboard's localStorage key so migrated blobs are found in place.
pub const VAULT_STORAGE_KEY: &str = "ef_vault_encrypted";

/// Credential vault over a key-value storage substrate.
pub struct CredentialVault<S> {
    store: S,
    kdf_iterations: u32,
}

impl<S: KeyValueStore> CredentialVault<S> {
    /// Creates a vault over `store` with the configured KDF work factor.
    pub fn new(store: S, config: &VaultConfig) -> Self {
        Self {
            store,
            kdf_iterations: config.kdf_iterations,
        }
    }

    /// True iff an encrypted blob exists at the vault key.
    pub async fn has_vault(&self) -> Result<bool, EstateError> {
        Ok(self.store.get(VAULT_STORAGE_KEY).await?.is_some())
    }

    /// Serializes `record` to JSON, encrypts it, and overwrites the stored
    /// blob. Idempotent; last write wins.
    pub async fn save_credentials(
        &self,
        record: &CredentialRecord,
        passphrase: &SecretString,
    ) -> Result<(), EstateError> {
        let json = serde_json::to_string(record)
            .map_err(|e| EstateError::Internal(format!("credential serialization failed: {e}")))?;
        let blob = envelope::encrypt(&json, passphrase, self.kdf_iterations)?;
        self.store.set(VAULT_STORAGE_KEY, &blob).await?;
        info!("credentials saved to vault");
        Ok(())
    }

    /// Decrypts and returns the stored record, or `None` if no blob exists.
    ///
    /// A wrong passphrase propagates as [`EstateError::Decryption`]
    /// unmodified -- it is never retried or guessed. A blob that
    /// authenticates but holds invalid JSON is a contract violation and
    /// surfaces as [`EstateError::CorruptVault`].
    pub async fn load_credentials(
        &self,
        passphrase: &SecretString,
    ) -> Result<Option<CredentialRecord>, EstateError> {
        let Some(blob) = self.store.get(VAULT_STORAGE_KEY).await? else {
            return Ok(None);
        };

        let json = envelope::decrypt(&blob, passphrase, self.kdf_iterations)?;
        let record: CredentialRecord = serde_json::from_str(&json)
            .map_err(|e| EstateError::CorruptVault(format!("invalid credential JSON: {e}")))?;

        debug!("vault unlocked");
        Ok(Some(record))
    }

    /// Deletes the blob unconditionally. Clearing an empty vault succeeds.
    pub async fn clear_vault(&self) -> Result<(), EstateError> {
        self.store.delete(VAULT_STORAGE_KEY).await?;
        info!("vault cleared");
        Ok(())
    }
}

/// Mask a secret value for display: `"1234...7890"` format.
///
/// Shows up to 4 leading and 4 trailing characters with `...` in between.
/// Short values (< 10 chars) are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    if value.len() < 10 {
        return "****".to_string();
    }
    let prefix = &value[..4.min(value.len())];
    let suffix = &value[value.len().saturating_sub(4)..];
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use estateflow_core::AuthMethod;
    use estateflow_test_utils::MemoryKvStore;

    /// Low-cost KDF config for fast tests.
    fn test_config() -> VaultConfig {
        VaultConfig {
            kdf_iterations: 1_000,
        }
    }

    fn test_vault() -> CredentialVault<MemoryKvStore> {
        CredentialVault::new(MemoryKvStore::new(), &test_config())
    }

    fn pass(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn vault_lifecycle_absent_then_present() {
        let vault = test_vault();
        let passphrase = pass("correct-horse");

        assert!(!vault.has_vault().await.unwrap());
        assert!(vault.load_credentials(&passphrase).await.unwrap().is_none());

        let record = CredentialRecord::from_credentials("a@b.com", "x");
        vault.save_credentials(&record, &passphrase).await.unwrap();

        assert!(vault.has_vault().await.unwrap());
    }

    #[tokio::test]
    async fn save_reload_end_to_end() {
        let vault = test_vault();
        let passphrase = pass("correct-horse");

        let record = CredentialRecord::from_credentials("a@b.com", "x");
        vault.save_credentials(&record, &passphrase).await.unwrap();

        let loaded = vault
            .load_credentials(&passphrase)
            .await
            .unwrap()
            .expect("vault should hold a record");
        assert_eq!(loaded, record);
        assert_eq!(loaded.auth_method, AuthMethod::Credentials);
        assert!(loaded.is_set);
    }

    #[tokio::test]
    async fn wrong_passphrase_propagates_decryption_error() {
        let vault = test_vault();
        let record = CredentialRecord::from_credentials("a@b.com", "x");
        vault
            .save_credentials(&record, &pass("correct-horse"))
            .await
            .unwrap();

        let result = vault.load_credentials(&pass("wrong")).await;
        assert!(matches!(result, Err(EstateError::Decryption)));
    }

    #[tokio::test]
    async fn save_is_idempotent_last_write_wins() {
        let vault = test_vault();
        let passphrase = pass("p");

        vault
            .save_credentials(&CredentialRecord::from_credentials("old@b.com", "1"), &passphrase)
            .await
            .unwrap();
        vault
            .save_credentials(&CredentialRecord::from_cookies("[{\"name\":\"xs\"}]"), &passphrase)
            .await
            .unwrap();

        let loaded = vault.load_credentials(&passphrase).await.unwrap().unwrap();
        assert_eq!(loaded.auth_method, AuthMethod::Cookies);
        assert!(loaded.email.is_none());
    }

    #[tokio::test]
    async fn clear_vault_removes_blob_and_is_idempotent() {
        let vault = test_vault();
        let passphrase = pass("p");

        vault
            .save_credentials(&CredentialRecord::from_credentials("a@b.com", "x"), &passphrase)
            .await
            .unwrap();
        assert!(vault.has_vault().await.unwrap());

        vault.clear_vault().await.unwrap();
        assert!(!vault.has_vault().await.unwrap());
        assert!(vault.load_credentials(&passphrase).await.unwrap().is_none());

        // Clearing again is not an error.
        vault.clear_vault().await.unwrap();
    }

    #[tokio::test]
    async fn authenticated_garbage_surfaces_corrupt_vault() {
        let store = MemoryKvStore::new();
        let config = test_config();
        let vault = CredentialVault::new(store.clone(), &config);
        let passphrase = pass("p");

        // A blob that decrypts fine but does not hold a credential record.
        let blob =
            crate::envelope::encrypt("not a credential object", &passphrase, config.kdf_iterations)
                .unwrap();
        store.set(VAULT_STORAGE_KEY, &blob).await.unwrap();

        let result = vault.load_credentials(&passphrase).await;
        assert!(matches!(result, Err(EstateError::CorruptVault(_))));
    }

    #[tokio::test]
    async fn stored_blob_is_not_plaintext() {
        let store = MemoryKvStore::new();
        let vault = CredentialVault::new(store.clone(), &test_config());

        vault
            .save_credentials(
                &CredentialRecord::from_credentials("a@b.com", "hunter2"),
                &pass("p"),
            )
            .await
            .unwrap();

        let blob = store.get(VAULT_STORAGE_KEY).await.unwrap().unwrap();
        assert!(!blob.contains("a@b.com"));
        assert!(!blob.contains("hunter2"));
        assert!(!blob.contains("authMethod"));
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("at-live-abcdefghijklmnop"), "at-l...mnop");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }
}
