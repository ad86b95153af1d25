// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for user vaults.

use async_trait::async_trait;

use crate::error::PwguardError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserId;
use crate::vault::{LabelPage, Vault};

/// Durable keyed storage of one [`Vault`] per user.
///
/// Implementations never see plaintext: entries are ciphertext envelopes.
#[async_trait]
pub trait VaultStore: PluginAdapter {
    /// Prepares the backing store (schema, indexes).
    async fn initialize(&self) -> Result<(), PwguardError>;

    /// Loads a vault, or [`PwguardError::NotFound`].
    async fn get(&self, user_id: UserId) -> Result<Vault, PwguardError>;

    /// Creates a vault, or [`PwguardError::DuplicateUser`] if one exists.
    async fn create(&self, vault: &Vault) -> Result<(), PwguardError>;

    /// Adds or replaces one entry, creating the vault when missing.
    async fn upsert_entry(
        &self,
        user_id: UserId,
        label: &str,
        envelope: &str,
    ) -> Result<(), PwguardError>;

    /// Removes one entry. A missing vault or label is not an error.
    async fn delete_entry(&self, user_id: UserId, label: &str) -> Result<(), PwguardError>;

    /// Lists one page of labels in ascending order, or
    /// [`PwguardError::NotFound`] when the user has no vault.
    async fn list_labels_page(
        &self,
        user_id: UserId,
        page: u32,
        page_size: u32,
    ) -> Result<LabelPage, PwguardError>;
}
