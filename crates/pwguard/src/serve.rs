// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwguard serve` command implementation.
//!
//! Opens the vault store, connects the Telegram channel and runs the
//! dispatcher until a shutdown signal arrives.

use std::sync::Arc;

use pwguard_config::{Environment, PwguardConfig};
use pwguard_core::{ChannelAdapter, HealthStatus, PwguardError, VaultStore};
use pwguard_session::{Dispatcher, DispatcherSettings, shutdown};
use pwguard_storage::SqliteVaultStore;
use pwguard_telegram::TelegramChannel;
use tracing::{info, warn};

/// Runs the `pwguard serve` command.
pub async fn run_serve(config: PwguardConfig) -> Result<(), PwguardError> {
    init_tracing(&config);

    info!(environment = %config.environment, "starting pwguard serve");

    let settings = DispatcherSettings::from_config(&config)?;

    let store = SqliteVaultStore::new(config.store.clone());
    store.initialize().await?;
    ensure_healthy(&store).await?;
    let store: Arc<dyn VaultStore> = Arc::new(store);

    let mut channel = TelegramChannel::new(config.telegram.clone())?;
    channel.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(channel);
    info!(
        allowed_users = config.telegram.allowed_users.len(),
        "telegram channel connected"
    );

    let cancel = shutdown::install_signal_handler();
    let mut dispatcher = Dispatcher::new(Arc::clone(&channel), store, settings);
    let result = dispatcher.run(cancel).await;

    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "telegram channel shutdown failed");
    }
    info!("pwguard stopped");
    result
}

/// Fails unless the store reports itself healthy or degraded.
pub(crate) async fn ensure_healthy(store: &dyn VaultStore) -> Result<(), PwguardError> {
    match store.health_check().await? {
        HealthStatus::Healthy => {
            info!(adapter = store.name(), "vault store healthy");
            Ok(())
        }
        HealthStatus::Degraded(reason) => {
            warn!(adapter = store.name(), reason = %reason, "vault store degraded");
            Ok(())
        }
        HealthStatus::Unhealthy(reason) => Err(PwguardError::Storage {
            source: reason.into(),
        }),
    }
}

/// Log filter used when `RUST_LOG` is not set.
fn default_filter(config: &PwguardConfig) -> String {
    let level = match config.environment() {
        Some(Environment::Development) => "debug",
        _ => config.log_level.as_str(),
    };
    format!("pwguard={level},warn")
}

/// Initializes the tracing subscriber for the configured environment.
fn init_tracing(config: &PwguardConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false);

    if config.environment() == Some(Environment::Development) {
        builder.pretty().init();
    } else {
        builder.compact().init();
    }
}
