// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the pwguard bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages. Keys without
//! a default are required and surface as missing-key diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level pwguard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PwguardConfig {
    /// Deployment environment: `development`, `production` or `test`.
    pub environment: String,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Telegram bot integration settings.
    pub telegram: TelegramConfig,

    /// Vault store settings.
    pub store: StoreConfig,

    /// Key derivation settings.
    pub crypto: CryptoConfig,

    /// Conversation settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl PwguardConfig {
    /// The parsed deployment environment, if it is a known one.
    pub fn environment(&self) -> Option<Environment> {
        self.environment.trim().parse().ok()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Known deployment environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Development,
    Production,
    Test,
}

/// Telegram bot configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub token: String,

    /// Telegram user ids allowed to talk to the bot. Empty allows everyone.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

/// Vault store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite database path, or `:memory:`.
    pub url: String,

    /// Name of the table holding the vault documents.
    pub name: String,
}

/// Key derivation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CryptoConfig {
    /// PBKDF2 iteration count. Existing vaults were sealed with 4096.
    pub iterations: u32,
}

/// Conversation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Seconds a revealed credential stays in the chat.
    #[serde(default = "default_reveal_ttl_secs")]
    pub reveal_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_ttl_secs: default_reveal_ttl_secs(),
        }
    }
}

fn default_reveal_ttl_secs() -> u64 {
    10
}
