// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the VaultStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use pwguard_config::model::StoreConfig;
use pwguard_core::{
    AdapterType, HealthStatus, LabelPage, PluginAdapter, PwguardError, UserId, Vault, VaultStore,
};

use crate::database::{Database, MEMORY_URL, map_tr_err};
use crate::queries;

/// SQLite-backed vault store.
///
/// The database is opened on the first call to [`VaultStore::initialize`].
pub struct SqliteVaultStore {
    config: StoreConfig,
    db: OnceCell<Database>,
}

impl SqliteVaultStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`VaultStore::initialize`] is called.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, PwguardError> {
        self.db.get().ok_or_else(|| PwguardError::Storage {
            source: "vault store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteVaultStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, PwguardError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PwguardError> {
        if let Some(db) = self.db.get()
            && self.config.url != MEMORY_URL
        {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl VaultStore for SqliteVaultStore {
    async fn initialize(&self) -> Result<(), PwguardError> {
        let db = Database::open(&self.config.url, &self.config.name).await?;
        self.db.set(db).map_err(|_| PwguardError::Storage {
            source: "vault store already initialized".into(),
        })?;
        debug!(url = %self.config.url, table = %self.config.name, "SQLite vault store initialized");
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Vault, PwguardError> {
        queries::vaults::get_vault(self.db()?, user_id)
            .await?
            .ok_or(PwguardError::NotFound { user_id })
    }

    async fn create(&self, vault: &Vault) -> Result<(), PwguardError> {
        if queries::vaults::insert_vault(self.db()?, vault).await? {
            Ok(())
        } else {
            Err(PwguardError::DuplicateUser {
                user_id: vault.user_id,
            })
        }
    }

    async fn upsert_entry(
        &self,
        user_id: UserId,
        label: &str,
        envelope: &str,
    ) -> Result<(), PwguardError> {
        queries::vaults::upsert_entry(self.db()?, user_id, label, envelope).await
    }

    async fn delete_entry(&self, user_id: UserId, label: &str) -> Result<(), PwguardError> {
        queries::vaults::delete_entry(self.db()?, user_id, label).await
    }

    async fn list_labels_page(
        &self,
        user_id: UserId,
        page: u32,
        page_size: u32,
    ) -> Result<LabelPage, PwguardError> {
        queries::vaults::list_labels_page(self.db()?, user_id, page, page_size)
            .await?
            .ok_or(PwguardError::NotFound { user_id })
    }
}
