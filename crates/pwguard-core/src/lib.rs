// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the pwguard bot.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the transport, the vault store, and the session dispatcher.

pub mod command;
pub mod error;
pub mod traits;
pub mod types;
pub mod vault;

// Re-export key items at crate root for ergonomic imports.
pub use command::{ButtonAction, Command, InvalidButtonPayload, MAX_LABEL_LEN};
pub use error::PwguardError;
pub use types::{
    AdapterType, Button, EventKind, HealthStatus, InboundEvent, Keyboard, MessageId,
    OutboundMessage, UserId,
};
pub use vault::{LabelPage, PAGE_SIZE, Vault};

pub use traits::{ChannelAdapter, PluginAdapter, VaultStore};
