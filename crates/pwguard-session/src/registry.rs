// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory map of in-progress dialogs.

use std::collections::HashMap;

use pwguard_core::UserId;

use crate::dialog::Dialog;

/// Dialogs keyed by user. Owned by the dispatcher, never persisted.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    dialogs: HashMap<UserId, Dialog>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the user's dialog.
    pub fn take(&mut self, user_id: UserId) -> Option<Dialog> {
        self.dialogs.remove(&user_id)
    }

    /// Stores the user's next dialog, or forgets the user on `None`.
    pub fn put(&mut self, user_id: UserId, dialog: Option<Dialog>) {
        match dialog {
            Some(dialog) => {
                self.dialogs.insert(user_id, dialog);
            }
            None => {
                self.dialogs.remove(&user_id);
            }
        }
    }

    pub fn get(&self, user_id: UserId) -> Option<&Dialog> {
        self.dialogs.get(&user_id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_none_forgets_user() {
        let mut registry = SessionRegistry::new();
        registry.put(UserId(1), Some(Dialog::CollectLabel));
        registry.put(UserId(2), Some(Dialog::CollectLabel));
        assert_eq!(registry.len(), 2);

        registry.put(UserId(1), None);
        assert!(registry.get(UserId(1)).is_none());
        assert!(registry.get(UserId(2)).is_some());
    }

    #[test]
    fn take_removes_dialog() {
        let mut registry = SessionRegistry::new();
        registry.put(UserId(1), Some(Dialog::SelectEntryToDelete { page: 1 }));
        assert!(matches!(
            registry.take(UserId(1)),
            Some(Dialog::SelectEntryToDelete { page: 1 })
        ));
        assert!(registry.is_empty());
    }
}
