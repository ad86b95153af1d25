// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite vault store.

use pwguard_config::model::StoreConfig;
use pwguard_core::{HealthStatus, PAGE_SIZE, PluginAdapter, PwguardError, UserId, Vault, VaultStore};
use pwguard_storage::SqliteVaultStore;
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> SqliteVaultStore {
    let store = SqliteVaultStore::new(StoreConfig {
        url: dir.path().join("vaults.db").display().to_string(),
        name: "data".to_string(),
    });
    store.initialize().await.expect("initialize");
    store
}

const ALICE: UserId = UserId(1001);
const BOB: UserId = UserId(2002);

#[tokio::test]
async fn missing_vault_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    assert!(matches!(
        store.get(ALICE).await,
        Err(PwguardError::NotFound { user_id }) if user_id == ALICE
    ));
    assert!(matches!(
        store.list_labels_page(ALICE, 1, PAGE_SIZE).await,
        Err(PwguardError::NotFound { .. })
    ));
}

#[tokio::test]
async fn create_then_get_returns_empty_vault() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.create(&Vault::new(ALICE)).await.unwrap();
    assert_eq!(store.get(ALICE).await.unwrap(), Vault::new(ALICE));

    let page = store.list_labels_page(ALICE, 1, PAGE_SIZE).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.is_empty());
}

#[tokio::test]
async fn second_create_is_duplicate() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.create(&Vault::new(ALICE)).await.unwrap();
    assert!(matches!(
        store.create(&Vault::new(ALICE)).await,
        Err(PwguardError::DuplicateUser { user_id }) if user_id == ALICE
    ));
}

#[tokio::test]
async fn upsert_creates_missing_vault_and_replaces_entries() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.upsert_entry(ALICE, "bank", "env-1").await.unwrap();
    store.upsert_entry(ALICE, "bank", "env-2").await.unwrap();
    store.upsert_entry(ALICE, "mail", "env-3").await.unwrap();

    let vault = store.get(ALICE).await.unwrap();
    assert_eq!(vault.envelope("bank"), Some("env-2"));
    assert_eq!(vault.envelope("mail"), Some("env-3"));
    assert_eq!(vault.entries.len(), 2);
}

#[tokio::test]
async fn vaults_are_isolated_per_user() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.upsert_entry(ALICE, "bank", "a").await.unwrap();
    store.upsert_entry(BOB, "bank", "b").await.unwrap();
    store.delete_entry(BOB, "bank").await.unwrap();

    assert_eq!(store.get(ALICE).await.unwrap().envelope("bank"), Some("a"));
    assert!(store.get(BOB).await.unwrap().entries.is_empty());
}

#[tokio::test]
async fn delete_of_missing_entry_or_vault_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.delete_entry(ALICE, "bank").await.unwrap();
    assert!(matches!(store.get(ALICE).await, Err(PwguardError::NotFound { .. })));

    store.upsert_entry(ALICE, "bank", "a").await.unwrap();
    store.delete_entry(ALICE, "other").await.unwrap();
    assert!(store.get(ALICE).await.unwrap().contains("bank"));
}

#[tokio::test]
async fn twenty_labels_paginate_by_nine() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    for i in (0..20).rev() {
        store
            .upsert_entry(ALICE, &format!("label{i:02}"), "env")
            .await
            .unwrap();
    }

    let first = store.list_labels_page(ALICE, 1, PAGE_SIZE).await.unwrap();
    assert_eq!(first.labels.len(), 9);
    assert_eq!(first.labels[0], "label00");
    assert_eq!(first.labels[8], "label08");
    assert!(first.has_next() && !first.has_prev());

    let last = store.list_labels_page(ALICE, 3, PAGE_SIZE).await.unwrap();
    assert_eq!(last.labels, ["label18", "label19"]);
    assert_eq!(last.total, 20);
    assert!(last.has_prev() && !last.has_next());
}

#[tokio::test]
async fn labels_with_json_metacharacters_survive() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let label = r#"my "work" mail \ 📧"#;
    store.upsert_entry(ALICE, label, "env").await.unwrap();

    let page = store.list_labels_page(ALICE, 1, PAGE_SIZE).await.unwrap();
    assert_eq!(page.labels, [label]);
    assert!(store.get(ALICE).await.unwrap().contains(label));
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir).await;
        store.upsert_entry(ALICE, "bank", "env").await.unwrap();
        store.shutdown().await.unwrap();
    }
    let store = open_store(&dir).await;
    assert_eq!(store.get(ALICE).await.unwrap().envelope("bank"), Some("env"));
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
}

#[tokio::test]
async fn uninitialized_store_reports_storage_error() {
    let store = SqliteVaultStore::new(StoreConfig {
        url: ":memory:".to_string(),
        name: "data".to_string(),
    });
    assert!(matches!(store.get(ALICE).await, Err(PwguardError::Storage { .. })));
}

#[tokio::test]
async fn in_memory_store_works() {
    let store = SqliteVaultStore::new(StoreConfig {
        url: ":memory:".to_string(),
        name: "vaults".to_string(),
    });
    store.initialize().await.unwrap();
    store.upsert_entry(ALICE, "bank", "env").await.unwrap();
    assert!(store.get(ALICE).await.unwrap().contains("bank"));
}

#[tokio::test]
async fn invalid_table_name_is_rejected() {
    let store = SqliteVaultStore::new(StoreConfig {
        url: ":memory:".to_string(),
        name: "data\"; DROP".to_string(),
    });
    assert!(matches!(store.initialize().await, Err(PwguardError::Config(_))));
}
