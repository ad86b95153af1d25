// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vault store with outage injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pwguard_core::{
    AdapterType, HealthStatus, LabelPage, PluginAdapter, PwguardError, UserId, Vault, VaultStore,
};

/// A `VaultStore` backed by a `HashMap`.
///
/// [`set_unavailable`](Self::set_unavailable) makes every call fail with a
/// storage error, as a lost database connection would.
#[derive(Default)]
pub struct MemoryVaultStore {
    vaults: Mutex<HashMap<UserId, Vault>>,
    unavailable: AtomicBool,
}

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of a user's vault, bypassing outage injection.
    pub async fn vault(&self, user_id: UserId) -> Option<Vault> {
        self.vaults.lock().await.get(&user_id).cloned()
    }

    fn check(&self) -> Result<(), PwguardError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PwguardError::storage(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "memory store unavailable",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MemoryVaultStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, PwguardError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("memory store unavailable".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PwguardError> {
        Ok(())
    }
}

#[async_trait]
impl VaultStore for MemoryVaultStore {
    async fn initialize(&self) -> Result<(), PwguardError> {
        self.check()
    }

    async fn get(&self, user_id: UserId) -> Result<Vault, PwguardError> {
        self.check()?;
        self.vaults
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(PwguardError::NotFound { user_id })
    }

    async fn create(&self, vault: &Vault) -> Result<(), PwguardError> {
        self.check()?;
        let mut vaults = self.vaults.lock().await;
        if vaults.contains_key(&vault.user_id) {
            return Err(PwguardError::DuplicateUser {
                user_id: vault.user_id,
            });
        }
        vaults.insert(vault.user_id, vault.clone());
        Ok(())
    }

    async fn upsert_entry(
        &self,
        user_id: UserId,
        label: &str,
        envelope: &str,
    ) -> Result<(), PwguardError> {
        self.check()?;
        self.vaults
            .lock()
            .await
            .entry(user_id)
            .or_insert_with(|| Vault::new(user_id))
            .upsert(label, envelope);
        Ok(())
    }

    async fn delete_entry(&self, user_id: UserId, label: &str) -> Result<(), PwguardError> {
        self.check()?;
        if let Some(vault) = self.vaults.lock().await.get_mut(&user_id) {
            vault.remove(label);
        }
        Ok(())
    }

    async fn list_labels_page(
        &self,
        user_id: UserId,
        page: u32,
        page_size: u32,
    ) -> Result<LabelPage, PwguardError> {
        self.check()?;
        self.vaults
            .lock()
            .await
            .get(&user_id)
            .map(|vault| vault.page(page, page_size))
            .ok_or(PwguardError::NotFound { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outage_fails_every_call_with_storage_error() {
        let store = MemoryVaultStore::new();
        store.upsert_entry(UserId(1), "bank", "env").await.unwrap();

        store.set_unavailable(true);
        let err = store.get(UserId(1)).await.unwrap_err();
        assert!(err.is_retryable());

        store.set_unavailable(false);
        assert!(store.get(UserId(1)).await.unwrap().contains("bank"));
    }
}
