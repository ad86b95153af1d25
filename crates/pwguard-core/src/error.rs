// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the pwguard bot.

use thiserror::Error;

use crate::types::UserId;

const CHANNEL_CLOSED: &str = "channel closed";

/// The primary error type used across all pwguard adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PwguardError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Vault store errors (connection failure, query failure, corrupt document).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A vault already exists for this user.
    #[error("vault already exists for user {user_id}")]
    DuplicateUser { user_id: UserId },

    /// No vault exists for this user yet.
    #[error("no vault for user {user_id}")]
    NotFound { user_id: UserId },

    /// A ciphertext envelope could not be decoded.
    #[error("malformed envelope: {0}")]
    Format(String),

    /// Key material has the wrong shape.
    #[error("invalid key: {0}")]
    Key(String),

    /// Channel adapter errors (connection failure, send or delete rejected).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PwguardError {
    /// Whether the failed dialog step can be retried by the user as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PwguardError::Storage { .. })
    }

    /// The error a channel adapter returns once no more events will arrive.
    pub fn channel_closed() -> Self {
        PwguardError::Channel {
            message: CHANNEL_CLOSED.to_string(),
            source: None,
        }
    }

    pub fn is_channel_closed(&self) -> bool {
        matches!(self, PwguardError::Channel { message, .. } if message == CHANNEL_CLOSED)
    }

    /// Wraps any error as a [`PwguardError::Storage`].
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PwguardError::Storage {
            source: Box::new(err),
        }
    }
}
