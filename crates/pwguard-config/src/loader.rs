// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pwguard.toml` > `~/.config/pwguard/pwguard.toml` > `/etc/pwguard/pwguard.toml`
//! with environment variable overrides via `PWGUARD_` prefix and the bare
//! variables of older deployments on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};

use crate::model::PwguardConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pwguard/pwguard.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "pwguard.toml";

/// The per-user configuration file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pwguard/pwguard.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. `/etc/pwguard/pwguard.toml` (system-wide)
/// 2. `~/.config/pwguard/pwguard.toml` (user XDG config)
/// 3. `./pwguard.toml` (local directory)
/// 4. `PWGUARD_*` environment variables
/// 5. `APP_ENV`, `TELEGRAM_KEY`, `MONGO_DB_URL`, `MONGO_DB_NAME`, `ITERATION`
pub fn load_config() -> Result<PwguardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only.
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PwguardConfig, figment::Error> {
    Figment::new().merge(Toml::string(toml_content)).extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PwguardConfig, figment::Error> {
    Figment::new()
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
        .merge(legacy_env_provider())
}

/// Map a lowercased, prefix-stripped `PWGUARD_*` name to a dotted key.
///
/// Only the leading section name becomes a table, so
/// `PWGUARD_SESSION_REVEAL_TTL_SECS` maps to `session.reveal_ttl_secs`.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 4] = ["telegram", "store", "crypto", "session"];

    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Map a bare variable of older deployments to its dotted key.
pub fn map_legacy_env_key(key: &str) -> Option<&'static str> {
    match key.to_ascii_lowercase().as_str() {
        "app_env" => Some("environment"),
        "telegram_key" => Some("telegram.token"),
        "mongo_db_url" => Some("store.url"),
        "mongo_db_name" => Some("store.name"),
        "iteration" => Some("crypto.iterations"),
        _ => None,
    }
}

/// Create the `PWGUARD_` provider using explicit `map()` for section-to-dot mapping.
///
/// `Env::split("_")` would turn `PWGUARD_SESSION_REVEAL_TTL_SECS` into
/// `session.reveal.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("PWGUARD_").map(|key| map_env_key(key.as_str()).into())
}

fn legacy_env_provider() -> Env {
    Env::raw().filter_map(|key| map_legacy_env_key(key.as_str()).map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_only_the_leading_section() {
        assert_eq!(map_env_key("telegram_token"), "telegram.token");
        assert_eq!(map_env_key("telegram_allowed_users"), "telegram.allowed_users");
        assert_eq!(map_env_key("session_reveal_ttl_secs"), "session.reveal_ttl_secs");
        assert_eq!(map_env_key("store_name"), "store.name");
        assert_eq!(map_env_key("log_level"), "log_level");
        assert_eq!(map_env_key("environment"), "environment");
    }

    #[test]
    fn legacy_keys_map_to_sections() {
        assert_eq!(map_legacy_env_key("TELEGRAM_KEY"), Some("telegram.token"));
        assert_eq!(map_legacy_env_key("iteration"), Some("crypto.iterations"));
        assert_eq!(map_legacy_env_key("MONGO_DB_NAME"), Some("store.name"));
        assert_eq!(map_legacy_env_key("HOME"), None);
    }
}
