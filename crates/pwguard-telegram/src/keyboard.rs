// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of transport-neutral keyboards to Telegram inline markup.

use pwguard_core::Keyboard;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Builds inline markup whose callback data is each button's encoded action.
pub fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.text.clone(), button.action.encode()))
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwguard_core::{Button, ButtonAction};
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("expected callback data, got {other:?}"),
        }
    }

    #[test]
    fn rows_and_payloads_are_preserved() {
        let keyboard = Keyboard {
            rows: vec![
                vec![
                    Button::new("bank", ButtonAction::Entry("bank".into())),
                    Button::new("mail", ButtonAction::Entry("mail".into())),
                ],
                vec![Button::new("Next >", ButtonAction::Page(2))],
            ],
        };

        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][1].text, "mail");
        assert_eq!(callback_data(&markup.inline_keyboard[0][0]), "entry:bank");
        assert_eq!(callback_data(&markup.inline_keyboard[1][0]), "page:2");
    }

    #[test]
    fn label_named_next_is_not_navigation() {
        let keyboard = Keyboard {
            rows: vec![vec![Button::new("next", ButtonAction::Entry("next".into()))]],
        };
        let markup = to_markup(&keyboard);
        assert_eq!(callback_data(&markup.inline_keyboard[0][0]), "entry:next");
    }
}
