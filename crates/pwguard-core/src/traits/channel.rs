// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging transport.

use async_trait::async_trait;

use crate::error::PwguardError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, MessageId, OutboundMessage, UserId};

/// Adapter for a bidirectional chat transport.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Starts receiving updates from the messaging platform.
    async fn connect(&mut self) -> Result<(), PwguardError>;

    /// Sends a message and returns the id the transport assigned to it.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PwguardError>;

    /// Deletes a message from the user's chat.
    async fn delete(&self, user_id: UserId, message_id: MessageId) -> Result<(), PwguardError>;

    /// Receives the next inbound event.
    ///
    /// Returns a [`PwguardError::Channel`] once the transport is closed.
    async fn receive(&self) -> Result<InboundEvent, PwguardError>;
}
