// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the pwguard bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, update filtering, inline keyboards and message
//! deletion.

pub mod handler;
pub mod keyboard;

use std::sync::Arc;

use async_trait::async_trait;
use pwguard_config::model::TelegramConfig;
use pwguard_core::{
    AdapterType, ChannelAdapter, HealthStatus, InboundEvent, MessageId, OutboundMessage,
    PluginAdapter, PwguardError, UserId,
};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling, filters updates by chat type and
/// allow-list, and forwards them in arrival order.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
    shutdown_token: Option<ShutdownToken>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    pub fn new(config: TelegramConfig) -> Result<Self, PwguardError> {
        if config.token.trim().is_empty() {
            return Err(PwguardError::Config("telegram.token cannot be empty".into()));
        }

        let bot = Bot::new(config.token.trim());
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
            shutdown_token: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn channel_error(action: &str, e: teloxide::RequestError) -> PwguardError {
    PwguardError::Channel {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PwguardError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), PwguardError> {
        debug!("Telegram channel shutting down");
        if let Some(token) = &self.shutdown_token {
            match token.shutdown() {
                Ok(stopped) => stopped.await,
                Err(_) => debug!("Telegram polling was not running"),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), PwguardError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let allowed_users: Arc<Vec<i64>> = Arc::new(self.config.allowed_users.clone());
        let message_tx = self.inbound_tx.clone();
        let message_allowed = Arc::clone(&allowed_users);
        let callback_tx = self.inbound_tx.clone();
        let callback_allowed = allowed_users;

        info!("starting Telegram long polling");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                let allowed = Arc::clone(&message_allowed);
                async move {
                    if let Some(event) = handler::message_to_event(&msg, &allowed)
                        && tx.send(event).await.is_err()
                    {
                        warn!("inbound channel closed, dropping message");
                    }
                    respond(())
                }
            }))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    let allowed = Arc::clone(&callback_allowed);
                    async move {
                        // Clears the client's loading indicator.
                        if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                            warn!(error = %e, "failed to answer callback query");
                        }
                        if let Some(event) = handler::callback_to_event(&query, &allowed)
                            && tx.send(event).await.is_err()
                        {
                            warn!("inbound channel closed, dropping callback");
                        }
                        respond(())
                    }
                },
            ));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|_| async {}) // Silently ignore other updates
            .build();
        self.shutdown_token = Some(dispatcher.shutdown_token());

        let handle = tokio::spawn(async move {
            dispatcher.dispatch().await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PwguardError> {
        let OutboundMessage {
            user_id,
            text,
            keyboard,
        } = msg;

        let mut request = self.bot.send_message(ChatId(user_id.0), text);
        if let Some(keyboard) = &keyboard {
            request = request.reply_markup(keyboard::to_markup(keyboard));
        }

        let sent = request.await.map_err(|e| channel_error("send message", e))?;
        Ok(MessageId(sent.id.0))
    }

    async fn delete(&self, user_id: UserId, message_id: MessageId) -> Result<(), PwguardError> {
        self.bot
            .delete_message(ChatId(user_id.0), teloxide::types::MessageId(message_id.0))
            .await
            .map_err(|e| channel_error("delete message", e))?;
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, PwguardError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(PwguardError::channel_closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> TelegramConfig {
        TelegramConfig {
            token: token.into(),
            allowed_users: vec![],
        }
    }

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramChannel::new(config("")).is_err());
        assert!(TelegramChannel::new(config("   ")).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        assert!(TelegramChannel::new(config("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11")).is_ok());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new(config("test:token")).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[tokio::test]
    async fn shutdown_before_connect_is_a_no_op() {
        let channel = TelegramChannel::new(config("test:token")).unwrap();
        channel.shutdown().await.unwrap();
    }
}
