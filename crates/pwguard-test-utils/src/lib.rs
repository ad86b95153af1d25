// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for pwguard integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without Telegram or an external database.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and capture
//! - [`MemoryVaultStore`] - In-memory vault store with outage injection
//! - [`TestHarness`] - Dispatcher wired to both, with dialog helpers

pub mod harness;
pub mod memory_store;
pub mod mock_channel;

pub use harness::TestHarness;
pub use memory_store::MemoryVaultStore;
pub use mock_channel::{MockChannel, SentMessage};
