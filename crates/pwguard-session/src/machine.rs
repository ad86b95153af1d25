// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user conversation state machine.
//!
//! [`StateMachine::step`] consumes the user's current [`Dialog`] and one
//! event, and returns the next dialog together with the side effects the
//! dispatcher must perform. It never talks to the transport itself.

use std::num::NonZeroU32;
use std::sync::Arc;

use pwguard_core::{
    ButtonAction, Command, EventKind, InboundEvent, MAX_LABEL_LEN, MessageId, PAGE_SIZE,
    PwguardError, UserId, Vault, VaultStore,
};
use pwguard_crypto::{CredentialPair, unseal};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::dialog::{Dialog, Purpose};
use crate::reply::Reply;

/// A side effect requested by a state machine step.
#[derive(Debug)]
pub enum Intent {
    /// Send a reply to the user.
    Send(Reply),
    /// Delete a message from the user's chat.
    Delete(MessageId),
    /// Show decrypted text, then scrub it after the reveal delay.
    Reveal(SecretString),
}

/// Result of one step.
#[derive(Debug)]
pub struct Transition {
    pub next: Option<Dialog>,
    pub intents: Vec<Intent>,
}

impl Transition {
    fn to(next: Dialog, reply: Reply) -> Self {
        Self {
            next: Some(next),
            intents: vec![Intent::Send(reply)],
        }
    }

    fn reset(reply: Reply) -> Self {
        Self {
            next: None,
            intents: vec![Intent::Send(reply)],
        }
    }

    fn stay(current: Option<Dialog>) -> Self {
        Self {
            next: current,
            intents: Vec::new(),
        }
    }

    fn stay_with(current: Option<Dialog>, reply: Reply) -> Self {
        Self {
            next: current,
            intents: vec![Intent::Send(reply)],
        }
    }
}

/// Maps a failed step to the reply the user sees.
///
/// Store outages keep the current dialog so the user can resend the same
/// input; anything else abandons it.
fn fail(err: &PwguardError, current: Option<Dialog>) -> Transition {
    if err.is_retryable() {
        warn!(error = %err, "vault store unavailable");
        Transition::stay_with(current, Reply::TryLater)
    } else {
        warn!(error = %err, "dialog step failed");
        Transition::reset(Reply::Failure)
    }
}

/// Drives dialogs against a vault store.
pub struct StateMachine {
    store: Arc<dyn VaultStore>,
    iterations: NonZeroU32,
}

impl StateMachine {
    pub fn new(store: Arc<dyn VaultStore>, iterations: NonZeroU32) -> Self {
        Self { store, iterations }
    }

    /// Advances `current` by one inbound event.
    ///
    /// Free text and keyboard messages are always scrubbed, whatever the
    /// outcome: the returned intents start with their deletion.
    pub async fn step(&self, current: Option<Dialog>, event: &InboundEvent) -> Transition {
        let user_id = event.user_id;
        match &event.kind {
            EventKind::Command(command) => self.on_command(user_id, current, command).await,
            EventKind::Text(text) => {
                let mut transition = match current {
                    Some(dialog) if dialog.awaits_text() => self.on_text(user_id, dialog, text).await,
                    other => Transition::stay(other),
                };
                transition.intents.insert(0, Intent::Delete(event.message_id));
                transition
            }
            EventKind::Button(action) => {
                let mut transition = match current {
                    Some(dialog) if dialog.awaits_button() => {
                        self.on_button(user_id, dialog, action).await
                    }
                    other => Transition::stay(other),
                };
                transition.intents.insert(0, Intent::Delete(event.message_id));
                transition
            }
        }
    }

    async fn on_command(
        &self,
        user_id: UserId,
        current: Option<Dialog>,
        command: &Command,
    ) -> Transition {
        if let Some(dialog) = &current
            && command.is_known()
        {
            debug!(user_id = %user_id, state = %dialog, command = command.name(), "dialog abandoned");
        }

        match command {
            Command::Unknown(_) => Transition::stay_with(current, Reply::IncorrectCommand),
            Command::Cancel => match current {
                Some(_) => Transition::reset(Reply::Cancelled),
                None => Transition::reset(Reply::NothingToCancel),
            },
            Command::Help => Transition::reset(Reply::Welcome),
            Command::Start => match self.ensure_vault(user_id).await {
                Ok(()) => Transition::reset(Reply::Welcome),
                Err(err) => fail(&err, None),
            },
            Command::Create => match self.ensure_vault(user_id).await {
                Ok(()) => Transition::to(Dialog::CollectLabel, Reply::AskLabel),
                Err(err) => fail(&err, None),
            },
            Command::Reveal => self.open_selection(user_id, Purpose::Reveal, 1, None).await,
            Command::Update => self.open_selection(user_id, Purpose::Update, 1, None).await,
            Command::Delete => self.open_selection(user_id, Purpose::Delete, 1, None).await,
        }
    }

    async fn on_text(&self, user_id: UserId, dialog: Dialog, text: &str) -> Transition {
        match dialog {
            Dialog::CollectLabel => self.on_label(user_id, text).await,

            Dialog::CollectPinForCreate { label } if text.trim().is_empty() => Transition::to(
                Dialog::CollectPinForCreate { label },
                Reply::AskPin { first_time: true },
            ),
            Dialog::CollectPinForUpdate { label } if text.trim().is_empty() => Transition::to(
                Dialog::CollectPinForUpdate { label },
                Reply::AskPin { first_time: false },
            ),
            Dialog::CollectPinForCreate { label } | Dialog::CollectPinForUpdate { label } => {
                Transition::to(
                    Dialog::CollectLogin {
                        label,
                        pin: SecretString::from(text.to_string()),
                    },
                    Reply::AskLogin,
                )
            }

            Dialog::CollectLogin { label, pin } => Transition::to(
                Dialog::CollectPassword {
                    label,
                    pin,
                    login: SecretString::from(text.to_string()),
                },
                Reply::AskPassword,
            ),

            Dialog::CollectPassword { label, pin, login } => {
                let pair = CredentialPair::new(login, SecretString::from(text.to_string()));
                let envelope = match pair.seal(&pin, self.iterations) {
                    Ok(envelope) => envelope,
                    Err(err) => return fail(&err, None),
                };
                match self.store.upsert_entry(user_id, &label, &envelope).await {
                    Ok(()) => {
                        debug!(user_id = %user_id, "entry saved");
                        Transition::reset(Reply::Saved)
                    }
                    Err(err) => {
                        let (login, _) = pair.into_parts();
                        fail(&err, Some(Dialog::CollectPassword { label, pin, login }))
                    }
                }
            }

            Dialog::CollectPinForReveal { label } if text.trim().is_empty() => Transition::to(
                Dialog::CollectPinForReveal { label },
                Reply::AskPin { first_time: false },
            ),
            Dialog::CollectPinForReveal { label } => self.on_reveal_pin(user_id, label, text).await,

            other => Transition::stay(Some(other)),
        }
    }

    async fn on_label(&self, user_id: UserId, text: &str) -> Transition {
        let label = text.trim();
        if label.is_empty() {
            return Transition::to(Dialog::CollectLabel, Reply::AskLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Transition::to(Dialog::CollectLabel, Reply::LabelTooLong);
        }

        let exists = match self.store.get(user_id).await {
            Ok(vault) => vault.contains(label),
            Err(PwguardError::NotFound { .. }) => false,
            Err(err) => return fail(&err, Some(Dialog::CollectLabel)),
        };

        let label = label.to_string();
        if exists {
            Transition::to(Dialog::ConfirmReplace { label }, Reply::LabelExists)
        } else {
            Transition::to(
                Dialog::CollectPinForCreate { label },
                Reply::AskPin { first_time: true },
            )
        }
    }

    async fn on_reveal_pin(&self, user_id: UserId, label: String, pin: &str) -> Transition {
        let vault = match self.store.get(user_id).await {
            Ok(vault) => vault,
            Err(PwguardError::NotFound { .. }) => return Transition::reset(Reply::NoData),
            Err(err) => return fail(&err, Some(Dialog::CollectPinForReveal { label })),
        };
        let Some(envelope) = vault.envelope(&label) else {
            return Transition::reset(Reply::EntryMissing);
        };

        match unseal(pin, self.iterations, envelope) {
            Ok(text) => {
                debug!(user_id = %user_id, "entry revealed");
                Transition {
                    next: None,
                    intents: vec![Intent::Reveal(text)],
                }
            }
            Err(err) => fail(&err, None),
        }
    }

    async fn on_button(&self, user_id: UserId, dialog: Dialog, action: &ButtonAction) -> Transition {
        if let Some((purpose, _)) = dialog.selection() {
            return match action {
                ButtonAction::Page(page) => {
                    self.open_selection(user_id, purpose, *page, Some(dialog)).await
                }
                ButtonAction::Entry(label) => self.on_entry(user_id, purpose, label.clone(), dialog).await,
                ButtonAction::Yes | ButtonAction::No => Transition::stay(Some(dialog)),
            };
        }

        match (dialog, action) {
            (Dialog::ConfirmReplace { label }, ButtonAction::Yes) => Transition::to(
                Dialog::CollectPinForCreate { label },
                Reply::AskPin { first_time: true },
            ),
            (Dialog::ConfirmReplace { .. }, ButtonAction::No) => {
                Transition::to(Dialog::CollectLabel, Reply::AskNewLabel)
            }
            (other, _) => Transition::stay(Some(other)),
        }
    }

    async fn on_entry(
        &self,
        user_id: UserId,
        purpose: Purpose,
        label: String,
        current: Dialog,
    ) -> Transition {
        let exists = match self.store.get(user_id).await {
            Ok(vault) => vault.contains(&label),
            Err(PwguardError::NotFound { .. }) => false,
            Err(err) => return fail(&err, Some(current)),
        };
        if !exists {
            debug!(user_id = %user_id, purpose = %purpose, "selected entry no longer exists");
            return Transition::reset(Reply::EntryMissing);
        }

        match purpose {
            Purpose::Reveal => Transition::to(
                Dialog::CollectPinForReveal { label },
                Reply::AskPin { first_time: false },
            ),
            Purpose::Update => Transition::to(
                Dialog::CollectPinForUpdate { label },
                Reply::AskPin { first_time: false },
            ),
            Purpose::Delete => match self.store.delete_entry(user_id, &label).await {
                Ok(()) => {
                    debug!(user_id = %user_id, "entry deleted");
                    Transition::reset(Reply::Deleted)
                }
                Err(err) => fail(&err, Some(current)),
            },
        }
    }

    /// Shows one page of labels for `purpose`.
    ///
    /// A page past the end falls back to the last page. `fallback` is kept
    /// when the store is unavailable.
    async fn open_selection(
        &self,
        user_id: UserId,
        purpose: Purpose,
        page: u32,
        fallback: Option<Dialog>,
    ) -> Transition {
        let listed = match self.store.list_labels_page(user_id, page, PAGE_SIZE).await {
            Ok(listed) if listed.is_empty() && listed.total > 0 => {
                self.store
                    .list_labels_page(user_id, listed.page_count(), PAGE_SIZE)
                    .await
            }
            other => other,
        };

        match listed {
            Ok(listed) if listed.total == 0 => Transition::reset(Reply::NoData),
            Ok(listed) => Transition::to(
                Dialog::select(purpose, listed.page),
                Reply::SelectEntry {
                    purpose,
                    page: listed,
                },
            ),
            Err(PwguardError::NotFound { .. }) => {
                if let Err(err) = self.ensure_vault(user_id).await {
                    warn!(user_id = %user_id, error = %err, "failed to create vault");
                }
                Transition::reset(Reply::NoData)
            }
            Err(err) => fail(&err, fallback),
        }
    }

    /// Creates an empty vault unless one exists.
    async fn ensure_vault(&self, user_id: UserId) -> Result<(), PwguardError> {
        match self.store.create(&Vault::new(user_id)).await {
            Ok(()) => {
                debug!(user_id = %user_id, "vault created");
                Ok(())
            }
            Err(PwguardError::DuplicateUser { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }
}
