// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing replies and their keyboards.

use pwguard_core::{Button, ButtonAction, Keyboard, LabelPage, OutboundMessage, UserId};

use crate::dialog::Purpose;

/// Labels per keyboard row.
pub const LABELS_PER_ROW: usize = 3;

/// Everything the bot can say, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    AskLabel,
    AskNewLabel,
    LabelTooLong,
    LabelExists,
    AskPin { first_time: bool },
    AskLogin,
    AskPassword,
    SelectEntry { purpose: Purpose, page: LabelPage },
    NoData,
    EntryMissing,
    Saved,
    Deleted,
    Cancelled,
    NothingToCancel,
    IncorrectCommand,
    TryLater,
    Failure,
}

impl Reply {
    pub fn text(&self) -> String {
        match self {
            Reply::Welcome => "Hello. This is password guard.\n\
                 Only encrypted passwords are stored here.\n\
                 Main commands:\n\
                 /create - encrypt data\n\
                 /reveal - decrypt data\n\
                 /update - update data\n\
                 /delete - delete data\n\
                 /cancel - stop the current action"
                .to_string(),
            Reply::AskLabel => "1️⃣ Ok. Let's start. First, enter a name for this password.".to_string(),
            Reply::AskNewLabel => "Please enter a new name.".to_string(),
            Reply::LabelTooLong => format!(
                "❌ That name is too long. Please use at most {} bytes.",
                pwguard_core::MAX_LABEL_LEN
            ),
            Reply::LabelExists => "🟠 You already have this name. Do you want to replace it?".to_string(),
            Reply::AskPin { first_time: true } => "2️⃣ Enter a pin code. You can use one pin code for all data or a separate pin code for each entry.\n\
                 🟠 NOTICE: if you lose your pin code, your data cannot be decrypted."
                .to_string(),
            Reply::AskPin { first_time: false } => "2️⃣ Enter your pin code.".to_string(),
            Reply::AskLogin => "3️⃣ Enter the login.".to_string(),
            Reply::AskPassword => "4️⃣ Enter the password.".to_string(),
            Reply::SelectEntry { purpose, page } => {
                let verb = match purpose {
                    Purpose::Reveal => "decrypt",
                    Purpose::Update => "update",
                    Purpose::Delete => "delete",
                };
                if page.page_count() > 1 {
                    format!(
                        "1️⃣ What do you want to {verb}? (page {}/{})",
                        page.page,
                        page.page_count()
                    )
                } else {
                    format!("1️⃣ What do you want to {verb}?")
                }
            }
            Reply::NoData => "🟠 You don't have any data.".to_string(),
            Reply::EntryMissing => "🟠 This entry no longer exists.".to_string(),
            Reply::Saved => "✅ Success. Your password has been encrypted and saved.".to_string(),
            Reply::Deleted => "✅ Success. The data was deleted.".to_string(),
            Reply::Cancelled => "Ok. The current action was cancelled.".to_string(),
            Reply::NothingToCancel => "There is nothing to cancel.".to_string(),
            Reply::IncorrectCommand => "❌ Incorrect command!".to_string(),
            Reply::TryLater => "❌ Something went wrong. Please try again later.".to_string(),
            Reply::Failure => "❌ Something went wrong. Please start over.".to_string(),
        }
    }

    pub fn keyboard(&self) -> Option<Keyboard> {
        match self {
            Reply::LabelExists => Some(Keyboard {
                rows: vec![vec![
                    Button::new("Yes", ButtonAction::Yes),
                    Button::new("No", ButtonAction::No),
                ]],
            }),
            Reply::SelectEntry { page, .. } => Some(selection_keyboard(page)),
            _ => None,
        }
    }

    pub fn into_outbound(self, user_id: UserId) -> OutboundMessage {
        OutboundMessage {
            user_id,
            text: self.text(),
            keyboard: self.keyboard(),
        }
    }
}

/// Labels three to a row, followed by a navigation row when there is more
/// than one page.
pub fn selection_keyboard(page: &LabelPage) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = page
        .labels
        .chunks(LABELS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|label| Button::new(label.clone(), ButtonAction::Entry(label.clone())))
                .collect()
        })
        .collect();

    let mut nav = Vec::new();
    if page.has_prev() {
        nav.push(Button::new("< Prev", ButtonAction::Page(page.page - 1)));
    }
    if page.has_next() {
        nav.push(Button::new("Next >", ButtonAction::Page(page.page + 1)));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    Keyboard { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwguard_core::PAGE_SIZE;

    fn page_of(total: usize, page: u32) -> LabelPage {
        LabelPage::from_sorted((0..total).map(|i| format!("l{i:02}")), total, page, PAGE_SIZE)
    }

    fn nav_actions(kb: &Keyboard) -> Vec<ButtonAction> {
        kb.buttons()
            .filter(|b| matches!(b.action, ButtonAction::Page(_)))
            .map(|b| b.action.clone())
            .collect()
    }

    #[test]
    fn first_of_three_pages_has_next_only() {
        let kb = selection_keyboard(&page_of(20, 1));
        assert_eq!(kb.rows.len(), 4);
        assert_eq!(kb.rows[0].len(), 3);
        assert_eq!(nav_actions(&kb), [ButtonAction::Page(2)]);
    }

    #[test]
    fn last_page_has_prev_only() {
        let kb = selection_keyboard(&page_of(20, 3));
        assert_eq!(kb.rows[0].len(), 2);
        assert_eq!(nav_actions(&kb), [ButtonAction::Page(2)]);
        assert_eq!(kb.rows.last().unwrap()[0].text, "< Prev");
    }

    #[test]
    fn single_page_has_no_navigation() {
        let kb = selection_keyboard(&page_of(4, 1));
        assert_eq!(kb.rows.len(), 2);
        assert!(nav_actions(&kb).is_empty());
    }

    #[test]
    fn entry_buttons_carry_their_label() {
        let kb = selection_keyboard(&page_of(1, 1));
        assert_eq!(kb.rows[0][0].action, ButtonAction::Entry("l00".into()));
    }

    #[test]
    fn selection_text_shows_page_only_when_paged() {
        let single = Reply::SelectEntry { purpose: Purpose::Delete, page: page_of(3, 1) };
        assert_eq!(single.text(), "1️⃣ What do you want to delete?");
        let paged = Reply::SelectEntry { purpose: Purpose::Reveal, page: page_of(20, 2) };
        assert!(paged.text().ends_with("(page 2/3)"));
    }

    #[test]
    fn confirmation_offers_yes_and_no() {
        let kb = Reply::LabelExists.keyboard().unwrap();
        let actions: Vec<_> = kb.buttons().map(|b| b.action.clone()).collect();
        assert_eq!(actions, [ButtonAction::Yes, ButtonAction::No]);
        assert!(Reply::Saved.keyboard().is_none());
    }
}
