// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state machine and dispatch loop for the pwguard bot.
//!
//! The [`Dispatcher`] is the single consumer of the channel:
//! - Receives events from a channel adapter
//! - Runs the user's dialog through the [`StateMachine`]
//! - Executes the resulting intents (replies, deletions, reveals)
//! - Scrubs pending reveals on shutdown

pub mod dialog;
pub mod machine;
pub mod registry;
pub mod reply;
pub mod reveal;
pub mod shutdown;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use pwguard_config::PwguardConfig;
use pwguard_core::{
    ChannelAdapter, EventKind, InboundEvent, OutboundMessage, PwguardError, UserId, VaultStore,
};
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use dialog::{Dialog, Purpose};
pub use machine::{Intent, StateMachine, Transition};
pub use registry::SessionRegistry;
pub use reply::Reply;
pub use reveal::RevealScheduler;

/// Settings the dispatcher needs from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct DispatcherSettings {
    pub iterations: NonZeroU32,
    pub reveal_ttl: Duration,
}

impl DispatcherSettings {
    pub fn from_config(config: &PwguardConfig) -> Result<Self, PwguardError> {
        let iterations = NonZeroU32::new(config.crypto.iterations).ok_or_else(|| {
            PwguardError::Config("crypto.iterations must be at least 1".to_string())
        })?;
        if config.session.reveal_ttl_secs == 0 {
            return Err(PwguardError::Config(
                "session.reveal_ttl_secs must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            iterations,
            reveal_ttl: Duration::from_secs(config.session.reveal_ttl_secs),
        })
    }
}

/// Routes channel events through per-user dialogs.
pub struct Dispatcher {
    channel: Arc<dyn ChannelAdapter>,
    store: Arc<dyn VaultStore>,
    machine: StateMachine,
    sessions: SessionRegistry,
    reveals: RevealScheduler,
}

impl Dispatcher {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        store: Arc<dyn VaultStore>,
        settings: DispatcherSettings,
    ) -> Self {
        info!(
            iterations = settings.iterations.get(),
            reveal_ttl_secs = settings.reveal_ttl.as_secs(),
            "dispatcher initialized"
        );
        Self {
            machine: StateMachine::new(Arc::clone(&store), settings.iterations),
            reveals: RevealScheduler::new(Arc::clone(&channel), settings.reveal_ttl),
            sessions: SessionRegistry::new(),
            channel,
            store,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn reveals(&self) -> &RevealScheduler {
        &self.reveals
    }

    /// Runs until the cancellation token fires or the channel closes.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), PwguardError> {
        info!("dispatcher running");

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => self.handle_event(event).await,
                        Err(e) if e.is_channel_closed() => {
                            info!("channel closed, stopping dispatcher");
                            break;
                        }
                        Err(e) => error!(error = %e, "channel receive error"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dispatcher");
                    break;
                }
            }
        }

        self.shutdown().await
    }

    /// Scrubs pending reveals and releases the store.
    pub async fn shutdown(&mut self) -> Result<(), PwguardError> {
        let pending = self.reveals.pending();
        if pending > 0 {
            info!(count = pending, "scrubbing pending reveals");
        }
        self.reveals.shutdown().await;
        self.store.shutdown().await?;
        info!("dispatcher stopped");
        Ok(())
    }

    /// Processes a single event to completion.
    pub async fn handle_event(&mut self, event: InboundEvent) {
        let user_id = event.user_id;

        if let EventKind::Command(command) = &event.kind
            && command.is_known()
        {
            self.reveals.cancel_user(user_id);
        }

        let current = self.sessions.take(user_id);
        debug!(
            user_id = %user_id,
            state = current.as_ref().map_or("none", Dialog::name),
            "handling event"
        );

        let transition = self.machine.step(current, &event).await;
        if let Some(next) = &transition.next {
            debug!(user_id = %user_id, state = %next, "dialog advanced");
        }
        self.sessions.put(user_id, transition.next);

        for intent in transition.intents {
            self.execute(user_id, intent).await;
        }
    }

    async fn execute(&mut self, user_id: UserId, intent: Intent) {
        match intent {
            Intent::Send(reply) => {
                if let Err(e) = self.channel.send(reply.into_outbound(user_id)).await {
                    warn!(user_id = %user_id, error = %e, "failed to send reply");
                }
            }
            Intent::Delete(message_id) => {
                if let Err(e) = self.channel.delete(user_id, message_id).await {
                    warn!(user_id = %user_id, error = %e, "failed to delete message");
                }
            }
            Intent::Reveal(text) => {
                let msg = OutboundMessage::text(user_id, text.expose_secret());
                match self.channel.send(msg).await {
                    Ok(message_id) => self.reveals.schedule(user_id, message_id),
                    Err(e) => warn!(user_id = %user_id, error = %e, "failed to send revealed entry"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwguard_config::load_and_validate_str;
    use pwguard_core::{ButtonAction, Command, MessageId};
    use pwguard_test_utils::{MemoryVaultStore, MockChannel};
    use tracing_test::traced_test;

    const USER: UserId = UserId(5);

    fn settings() -> DispatcherSettings {
        DispatcherSettings {
            iterations: pwguard_crypto::DEFAULT_ITERATIONS,
            reveal_ttl: Duration::from_secs(10),
        }
    }

    fn event(id: i32, kind: EventKind) -> InboundEvent {
        InboundEvent {
            user_id: USER,
            message_id: MessageId(id),
            kind,
        }
    }

    fn config_with(iterations: u32, ttl: u64) -> PwguardConfig {
        load_and_validate_str(&format!(
            r#"
            environment = "test"
            [telegram]
            token = "1:a"
            [store]
            url = ":memory:"
            name = "data"
            [crypto]
            iterations = {iterations}
            [session]
            reveal_ttl_secs = {ttl}
            "#
        ))
        .unwrap()
    }

    #[test]
    fn settings_follow_config() {
        let settings = DispatcherSettings::from_config(&config_with(1000, 30)).unwrap();
        assert_eq!(settings.iterations.get(), 1000);
        assert_eq!(settings.reveal_ttl, Duration::from_secs(30));
    }

    #[test]
    fn settings_reject_zero_iterations() {
        let mut config = config_with(1000, 30);
        config.crypto.iterations = 0;
        assert!(DispatcherSettings::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn sessions_are_dropped_when_dialog_ends() {
        let channel = Arc::new(MockChannel::new());
        let store = Arc::new(MemoryVaultStore::new());
        let mut dispatcher = Dispatcher::new(channel, store, settings());

        dispatcher
            .handle_event(event(1, EventKind::Command(Command::Create)))
            .await;
        assert_eq!(dispatcher.sessions().len(), 1);
        dispatcher
            .handle_event(event(2, EventKind::Command(Command::Cancel)))
            .await;
        assert!(dispatcher.sessions().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn secrets_never_reach_the_log() {
        let channel = Arc::new(MockChannel::new());
        let store = Arc::new(MemoryVaultStore::new());
        let mut dispatcher = Dispatcher::new(channel.clone(), store, settings());

        let steps = [
            EventKind::Command(Command::Create),
            EventKind::Text("bank".into()),
            EventKind::Text("zq-pin".into()),
            EventKind::Text("alice-login".into()),
            EventKind::Text("hunter2-pw".into()),
            EventKind::Command(Command::Reveal),
        ];
        for (id, kind) in (1..).zip(steps) {
            dispatcher.handle_event(event(id, kind)).await;
        }

        let keyboard = channel
            .sent_to(USER)
            .await
            .into_iter()
            .rev()
            .find(|m| m.message.keyboard.is_some())
            .unwrap();
        dispatcher
            .handle_event(InboundEvent {
                user_id: USER,
                message_id: keyboard.id,
                kind: EventKind::Button(ButtonAction::Entry("bank".into())),
            })
            .await;
        dispatcher
            .handle_event(event(10, EventKind::Text("zq-pin".into())))
            .await;

        let last = channel.sent_to(USER).await.pop().unwrap();
        assert_eq!(last.message.text, "alice-login:hunter2-pw");
        assert_eq!(dispatcher.reveals().pending(), 1);

        assert!(logs_contain("entry revealed"));
        assert!(!logs_contain("zq-pin"));
        assert!(!logs_contain("alice-login"));
        assert!(!logs_contain("hunter2-pw"));
    }
}
