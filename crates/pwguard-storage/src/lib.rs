// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite vault store for the pwguard bot.
//!
//! One row per user in a configurable table, with the label map kept as a
//! JSON document. Writes go through tokio-rusqlite's single background
//! thread, so read-modify-write of a vault never interleaves.

pub mod adapter;
pub mod database;
pub mod queries;

pub use adapter::SqliteVaultStore;
pub use database::Database;
