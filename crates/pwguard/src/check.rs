// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwguard check-config` command implementation.

use pwguard_config::PwguardConfig;
use pwguard_core::{PluginAdapter, PwguardError, VaultStore};
use pwguard_storage::SqliteVaultStore;

use crate::serve::ensure_healthy;

/// Prints the effective configuration and opens the vault store once.
///
/// The bot token is never printed.
pub async fn run_check_config(config: &PwguardConfig) -> Result<(), PwguardError> {
    println!("environment:      {}", config.environment);
    println!("log level:        {}", config.log_level);
    println!(
        "allowed users:    {}",
        if config.telegram.allowed_users.is_empty() {
            "everyone".to_string()
        } else {
            config.telegram.allowed_users.len().to_string()
        }
    );
    println!("store:            {} (table {})", config.store.url, config.store.name);
    println!("kdf iterations:   {}", config.crypto.iterations);
    println!("reveal ttl:       {}s", config.session.reveal_ttl_secs);

    let store = SqliteVaultStore::new(config.store.clone());
    store.initialize().await?;
    ensure_healthy(&store).await?;
    store.shutdown().await?;

    println!("config ok");
    Ok(())
}
