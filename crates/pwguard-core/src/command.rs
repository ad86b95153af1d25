// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot commands and typed inline button payloads.

use std::fmt;
use std::str::FromStr;

use strum::EnumString;

/// A `/command` sent by the user.
///
/// The short aliases are the command names of the first public release.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    Start,
    Help,
    #[strum(serialize = "create", serialize = "enc")]
    Create,
    #[strum(serialize = "reveal", serialize = "dec")]
    Reveal,
    #[strum(serialize = "update", serialize = "upd")]
    Update,
    #[strum(serialize = "delete", serialize = "del")]
    Delete,
    Cancel,
    #[strum(default)]
    Unknown(String),
}

impl Command {
    /// Parses a chat message as a command.
    ///
    /// Returns `None` when the text is not a command at all. A trailing
    /// `@botname` and any arguments are ignored.
    pub fn parse(text: &str) -> Option<Command> {
        let token = text.trim_start().strip_prefix('/')?.split_whitespace().next()?;
        let name = token.split_once('@').map_or(token, |(name, _)| name);
        if name.is_empty() {
            return None;
        }
        Some(Command::from_str(name).unwrap_or_else(|_| Command::Unknown(name.to_string())))
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Create => "create",
            Command::Reveal => "reveal",
            Command::Update => "update",
            Command::Delete => "delete",
            Command::Cancel => "cancel",
            Command::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Command::Unknown(_))
    }
}

/// Typed payload carried by an inline keyboard button.
///
/// Encoded as `yes`, `no`, `page:<n>` or `entry:<label>`, so a label can
/// never be mistaken for a navigation button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Yes,
    No,
    Page(u32),
    Entry(String),
}

/// Telegram limits callback data to 64 bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

const ENTRY_PREFIX: &str = "entry:";
const PAGE_PREFIX: &str = "page:";

/// Longest label, in bytes, that still fits into an `entry:` payload.
pub const MAX_LABEL_LEN: usize = MAX_CALLBACK_DATA_LEN - ENTRY_PREFIX.len();

/// Error returned when a callback payload is not a known [`ButtonAction`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized button payload")]
pub struct InvalidButtonPayload;

impl ButtonAction {
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonAction::Yes => f.write_str("yes"),
            ButtonAction::No => f.write_str("no"),
            ButtonAction::Page(n) => write!(f, "{PAGE_PREFIX}{n}"),
            ButtonAction::Entry(label) => write!(f, "{ENTRY_PREFIX}{label}"),
        }
    }
}

impl FromStr for ButtonAction {
    type Err = InvalidButtonPayload;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(ButtonAction::Yes),
            "no" => Ok(ButtonAction::No),
            _ => {
                if let Some(label) = s.strip_prefix(ENTRY_PREFIX) {
                    Ok(ButtonAction::Entry(label.to_string()))
                } else if let Some(n) = s.strip_prefix(PAGE_PREFIX) {
                    n.parse::<u32>()
                        .ok()
                        .filter(|n| *n >= 1)
                        .map(ButtonAction::Page)
                        .ok_or(InvalidButtonPayload)
                } else {
                    Err(InvalidButtonPayload)
                }
            }
        }
    }
}
