// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user dialog states.
//!
//! Each variant carries exactly the data collected so far, so a state can
//! never hold a pin without the label it belongs to.

use std::fmt;

use secrecy::SecretString;

/// What a selection keyboard is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Reveal,
    Update,
    Delete,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Purpose::Reveal => "reveal",
            Purpose::Update => "update",
            Purpose::Delete => "delete",
        })
    }
}

/// An in-progress conversation. "No dialog" is the absence of a value.
///
/// Secrets are held as [`SecretString`], whose `Debug` output is redacted.
#[derive(Debug)]
pub enum Dialog {
    CollectLabel,
    ConfirmReplace {
        label: String,
    },
    CollectPinForCreate {
        label: String,
    },
    CollectPinForReveal {
        label: String,
    },
    CollectPinForUpdate {
        label: String,
    },
    CollectLogin {
        label: String,
        pin: SecretString,
    },
    CollectPassword {
        label: String,
        pin: SecretString,
        login: SecretString,
    },
    SelectEntryToReveal {
        page: u32,
    },
    SelectEntryToUpdate {
        page: u32,
    },
    SelectEntryToDelete {
        page: u32,
    },
}

impl Dialog {
    /// The selection state for `purpose` showing `page`.
    pub fn select(purpose: Purpose, page: u32) -> Self {
        match purpose {
            Purpose::Reveal => Dialog::SelectEntryToReveal { page },
            Purpose::Update => Dialog::SelectEntryToUpdate { page },
            Purpose::Delete => Dialog::SelectEntryToDelete { page },
        }
    }

    /// The purpose and page of a selection state.
    pub fn selection(&self) -> Option<(Purpose, u32)> {
        match *self {
            Dialog::SelectEntryToReveal { page } => Some((Purpose::Reveal, page)),
            Dialog::SelectEntryToUpdate { page } => Some((Purpose::Update, page)),
            Dialog::SelectEntryToDelete { page } => Some((Purpose::Delete, page)),
            _ => None,
        }
    }

    /// Whether this state consumes free text.
    pub fn awaits_text(&self) -> bool {
        matches!(
            self,
            Dialog::CollectLabel
                | Dialog::CollectPinForCreate { .. }
                | Dialog::CollectPinForReveal { .. }
                | Dialog::CollectPinForUpdate { .. }
                | Dialog::CollectLogin { .. }
                | Dialog::CollectPassword { .. }
        )
    }

    /// Whether this state consumes keyboard clicks.
    pub fn awaits_button(&self) -> bool {
        !self.awaits_text()
    }

    /// Stable state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Dialog::CollectLabel => "collect-label",
            Dialog::ConfirmReplace { .. } => "confirm-replace",
            Dialog::CollectPinForCreate { .. } => "collect-pin-for-create",
            Dialog::CollectPinForReveal { .. } => "collect-pin-for-reveal",
            Dialog::CollectPinForUpdate { .. } => "collect-pin-for-update",
            Dialog::CollectLogin { .. } => "collect-login",
            Dialog::CollectPassword { .. } => "collect-password",
            Dialog::SelectEntryToReveal { .. } => "select-entry-to-reveal",
            Dialog::SelectEntryToUpdate { .. } => "select-entry-to-update",
            Dialog::SelectEntryToDelete { .. } => "select-entry-to-delete",
        }
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
