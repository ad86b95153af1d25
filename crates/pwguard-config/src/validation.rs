// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the table name shape and positive iteration counts.

use crate::diagnostic::ConfigError;
use crate::model::{Environment, PwguardConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PwguardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.environment().is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "environment must be one of {}, {}, {}; got `{}`",
                Environment::Development,
                Environment::Production,
                Environment::Test,
                config.environment
            ),
        });
    }

    if config.telegram.token.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "telegram.token must not be empty".to_string(),
        });
    }

    let url = config.store.url.trim();
    if url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.url must not be empty".to_string(),
        });
    } else if url.contains("://") {
        errors.push(ConfigError::Validation {
            message: format!("store.url must be a SQLite database path, got `{url}`"),
        });
    }

    if !is_identifier(&config.store.name) {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.name must start with a letter or underscore and contain only letters, digits and underscores, got `{}`",
                config.store.name
            ),
        });
    }

    if config.crypto.iterations < 1 {
        errors.push(ConfigError::Validation {
            message: "crypto.iterations must be at least 1".to_string(),
        });
    }

    if config.session.reveal_ttl_secs < 1 {
        errors.push(ConfigError::Validation {
            message: "session.reveal_ttl_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, safe to splice into SQL as a table name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
