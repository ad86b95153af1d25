// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and conversion.
//!
//! Determines whether an incoming Telegram update should be processed based
//! on chat type and the allow-list, then converts it into a
//! transport-neutral [`InboundEvent`].

use pwguard_core::{ButtonAction, Command, EventKind, InboundEvent, MessageId, UserId};
use teloxide::types::{CallbackQuery, Chat, ChatKind, Message, User};
use tracing::debug;

/// Checks whether the update comes from a private chat.
///
/// Group, supergroup, and channel chats return `false`.
pub fn is_private(chat: &Chat) -> bool {
    matches!(chat.kind, ChatKind::Private(_))
}

/// Checks whether the sender is allowed to use the bot.
///
/// An empty allow-list admits everyone.
pub fn is_authorized(user: &User, allowed_users: &[i64]) -> bool {
    allowed_users.is_empty()
        || allowed_users
            .iter()
            .any(|id| u64::try_from(*id).is_ok_and(|id| id == user.id.0))
}

fn user_id(user: &User) -> Option<UserId> {
    i64::try_from(user.id.0).ok().map(UserId)
}

/// Converts a message into a command or text event.
///
/// Returns `None` for filtered senders and for anything but text.
pub fn message_to_event(msg: &Message, allowed_users: &[i64]) -> Option<InboundEvent> {
    if !is_private(&msg.chat) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-private message");
        return None;
    }
    let user = msg.from.as_ref()?;
    if !is_authorized(user, allowed_users) {
        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
        return None;
    }
    let Some(text) = msg.text() else {
        debug!(msg_id = msg.id.0, "ignoring non-text message");
        return None;
    };

    let kind = match Command::parse(text) {
        Some(command) => EventKind::Command(command),
        None => EventKind::Text(text.to_string()),
    };

    Some(InboundEvent {
        user_id: user_id(user)?,
        message_id: MessageId(msg.id.0),
        kind,
    })
}

/// Converts a callback query into a button event.
///
/// The event's message id is the bot message that carried the keyboard.
pub fn callback_to_event(query: &CallbackQuery, allowed_users: &[i64]) -> Option<InboundEvent> {
    let message = query.message.as_ref()?;
    if !is_private(message.chat()) {
        debug!(chat_id = message.chat().id.0, "ignoring non-private callback");
        return None;
    }
    if !is_authorized(&query.from, allowed_users) {
        debug!(chat_id = message.chat().id.0, "ignoring unauthorized callback");
        return None;
    }

    let data = query.data.as_deref()?;
    let action = match data.parse::<ButtonAction>() {
        Ok(action) => action,
        Err(e) => {
            debug!(error = %e, "ignoring unrecognized callback data");
            return None;
        }
    };

    Some(InboundEvent {
        user_id: user_id(&query.from)?,
        message_id: MessageId(message.id().0),
        kind: EventKind::Button(action),
    })
}
