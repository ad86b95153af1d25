// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound messages and deletions for assertion in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use pwguard_core::{
    AdapterType, ChannelAdapter, HealthStatus, InboundEvent, MessageId, OutboundMessage,
    PluginAdapter, PwguardError, UserId,
};

/// Ids handed out by [`MockChannel::send`] start here.
pub const FIRST_SENT_ID: i32 = 10_000;

/// A message captured by [`MockChannel::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: MessageId,
    pub message: OutboundMessage,
}

/// A mock messaging channel for testing.
pub struct MockChannel {
    inbound: Mutex<VecDeque<InboundEvent>>,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<(UserId, MessageId)>>,
    notify: Notify,
    next_id: AtomicI32,
    closed: AtomicBool,
    fail_sends: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            notify: Notify::new(),
            next_id: AtomicI32::new(FIRST_SENT_ID),
            closed: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
        }
    }

    /// Queue an event for the next `receive()`.
    pub async fn inject(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// After the queue drains, `receive()` reports the channel as closed.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Make every `send()` fail until reset.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, user_id: UserId) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.message.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn deleted(&self) -> Vec<(UserId, MessageId)> {
        self.deleted.lock().await.clone()
    }

    pub async fn was_deleted(&self, user_id: UserId, message_id: MessageId) -> bool {
        self.deleted.lock().await.contains(&(user_id, message_id))
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
        self.deleted.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PwguardError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PwguardError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), PwguardError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PwguardError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(PwguardError::Channel {
                message: "mock send failure".to_string(),
                source: None,
            });
        }
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().await.push(SentMessage { id, message: msg });
        Ok(id)
    }

    async fn delete(&self, user_id: UserId, message_id: MessageId) -> Result<(), PwguardError> {
        self.deleted.lock().await.push((user_id, message_id));
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, PwguardError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
                if self.closed.load(Ordering::SeqCst) {
                    return Err(PwguardError::channel_closed());
                }
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwguard_core::EventKind;

    fn text_event(text: &str) -> InboundEvent {
        InboundEvent {
            user_id: UserId(1),
            message_id: MessageId(1),
            kind: EventKind::Text(text.to_string()),
        }
    }

    #[tokio::test]
    async fn receive_returns_injected_events_in_order() {
        let channel = MockChannel::new();
        channel.inject(text_event("a")).await;
        channel.inject(text_event("b")).await;

        assert_eq!(channel.receive().await.unwrap().kind, EventKind::Text("a".into()));
        assert_eq!(channel.receive().await.unwrap().kind, EventKind::Text("b".into()));
    }

    #[tokio::test]
    async fn send_assigns_increasing_ids() {
        let channel = MockChannel::new();
        let a = channel.send(OutboundMessage::text(UserId(1), "x")).await.unwrap();
        let b = channel.send(OutboundMessage::text(UserId(2), "y")).await.unwrap();
        assert_eq!(a, MessageId(FIRST_SENT_ID));
        assert_eq!(b, MessageId(FIRST_SENT_ID + 1));
        assert_eq!(channel.sent_to(UserId(2)).await.len(), 1);
    }

    #[tokio::test]
    async fn closed_channel_drains_then_reports_closed() {
        let channel = MockChannel::new();
        channel.inject(text_event("last")).await;
        channel.close();

        assert!(channel.receive().await.is_ok());
        assert!(channel.receive().await.unwrap_err().is_channel_closed());
    }

    #[tokio::test]
    async fn failing_sends_are_errors() {
        let channel = MockChannel::new();
        channel.set_fail_sends(true);
        assert!(channel.send(OutboundMessage::text(UserId(1), "x")).await.is_err());
        assert!(channel.sent_messages().await.is_empty());
    }
}
