// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dialog testing.
//!
//! `TestHarness` assembles a [`Dispatcher`] with a [`MockChannel`] and a vault
//! store (a temp SQLite database unless another store is supplied), and
//! drives it one event at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use pwguard_config::model::StoreConfig;
use pwguard_core::{
    ButtonAction, Command, EventKind, InboundEvent, MessageId, PwguardError, UserId, VaultStore,
};
use pwguard_crypto::DEFAULT_ITERATIONS;
use pwguard_session::{Dispatcher, DispatcherSettings};
use pwguard_storage::SqliteVaultStore;

use crate::mock_channel::{MockChannel, SentMessage};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    store: Option<Arc<dyn VaultStore>>,
    settings: DispatcherSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            store: None,
            settings: DispatcherSettings {
                iterations: DEFAULT_ITERATIONS,
                reveal_ttl: Duration::from_secs(10),
            },
        }
    }

    /// Use this store instead of a temp SQLite database.
    pub fn with_store(mut self, store: Arc<dyn VaultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_reveal_ttl(mut self, ttl: Duration) -> Self {
        self.settings.reveal_ttl = ttl;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, PwguardError> {
        let (store, temp_dir) = match self.store {
            Some(store) => (store, None),
            None => {
                let temp_dir = tempfile::TempDir::new().map_err(PwguardError::storage)?;
                let store = SqliteVaultStore::new(StoreConfig {
                    url: temp_dir.path().join("vaults.db").display().to_string(),
                    name: "data".to_string(),
                });
                store.initialize().await?;
                let store: Arc<dyn VaultStore> = Arc::new(store);
                (store, Some(temp_dir))
            }
        };

        let channel = Arc::new(MockChannel::new());
        let dispatcher = Dispatcher::new(
            Arc::clone(&channel) as _,
            Arc::clone(&store),
            self.settings,
        );

        Ok(TestHarness {
            channel,
            store,
            dispatcher,
            next_inbound_id: AtomicI32::new(1),
            _temp_dir: temp_dir,
        })
    }
}

/// A dispatcher wired to a mock channel.
pub struct TestHarness {
    channel: Arc<MockChannel>,
    store: Arc<dyn VaultStore>,
    dispatcher: Dispatcher,
    next_inbound_id: AtomicI32,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn channel(&self) -> &MockChannel {
        &self.channel
    }

    pub fn store(&self) -> &Arc<dyn VaultStore> {
        &self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    fn next_inbound(&self) -> MessageId {
        MessageId(self.next_inbound_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Sends `/command` text as the user.
    ///
    /// # Panics
    ///
    /// Panics if `text` is not a command.
    pub async fn command(&mut self, user_id: UserId, text: &str) {
        let command = Command::parse(text).expect("not a command");
        let message_id = self.next_inbound();
        self.dispatcher
            .handle_event(InboundEvent {
                user_id,
                message_id,
                kind: EventKind::Command(command),
            })
            .await;
    }

    /// Sends free text as the user and returns the id of the user's message.
    pub async fn text(&mut self, user_id: UserId, text: &str) -> MessageId {
        let message_id = self.next_inbound();
        self.dispatcher
            .handle_event(InboundEvent {
                user_id,
                message_id,
                kind: EventKind::Text(text.to_string()),
            })
            .await;
        message_id
    }

    /// Clicks a button on the most recent keyboard sent to the user and
    /// returns the id of that keyboard message.
    ///
    /// # Panics
    ///
    /// Panics if the user has never been sent a keyboard.
    pub async fn click(&mut self, user_id: UserId, action: ButtonAction) -> MessageId {
        let keyboard_id = self
            .last_keyboard(user_id)
            .await
            .expect("no keyboard sent to user")
            .id;
        self.dispatcher
            .handle_event(InboundEvent {
                user_id,
                message_id: keyboard_id,
                kind: EventKind::Button(action),
            })
            .await;
        keyboard_id
    }

    pub async fn click_label(&mut self, user_id: UserId, label: &str) -> MessageId {
        self.click(user_id, ButtonAction::Entry(label.to_string())).await
    }

    /// Text of the last message sent to the user.
    pub async fn last_reply(&self, user_id: UserId) -> Option<String> {
        self.channel
            .sent_to(user_id)
            .await
            .pop()
            .map(|m| m.message.text)
    }

    pub async fn last_keyboard(&self, user_id: UserId) -> Option<SentMessage> {
        self.channel
            .sent_to(user_id)
            .await
            .into_iter()
            .rev()
            .find(|m| m.message.keyboard.is_some())
    }

    /// Walks a full create dialog: `/create`, label, pin, login, password.
    pub async fn create_entry(
        &mut self,
        user_id: UserId,
        label: &str,
        pin: &str,
        login: &str,
        password: &str,
    ) {
        self.command(user_id, "/create").await;
        self.text(user_id, label).await;
        self.text(user_id, pin).await;
        self.text(user_id, login).await;
        self.text(user_id, password).await;
    }

    /// Walks a reveal dialog and returns the last message sent.
    pub async fn reveal_entry(&mut self, user_id: UserId, label: &str, pin: &str) -> Option<String> {
        self.command(user_id, "/reveal").await;
        self.last_keyboard(user_id).await?;
        self.click_label(user_id, label).await;
        self.text(user_id, pin).await;
        self.last_reply(user_id).await
    }
}
