// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user vault document and label pagination.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Labels shown per selection keyboard.
pub const PAGE_SIZE: u32 = 9;

/// One user's stored credentials: label to ciphertext envelope.
///
/// An empty map is the normal state of a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub user_id: UserId,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Vault {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            entries: BTreeMap::new(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn envelope(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Inserts or replaces an entry.
    pub fn upsert(&mut self, label: impl Into<String>, envelope: impl Into<String>) {
        self.entries.insert(label.into(), envelope.into());
    }

    /// Removes an entry. Missing labels are ignored.
    pub fn remove(&mut self, label: &str) {
        self.entries.remove(label);
    }

    pub fn page(&self, page: u32, page_size: u32) -> LabelPage {
        LabelPage::from_sorted(self.entries.keys().cloned(), self.entries.len(), page, page_size)
    }
}

/// One page of a user's labels in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPage {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub labels: Vec<String>,
    /// Number of labels in the whole vault.
    pub total: usize,
}

impl LabelPage {
    /// Slices an already sorted label sequence. Page numbers below 1 are
    /// treated as 1.
    pub fn from_sorted(
        labels: impl IntoIterator<Item = String>,
        total: usize,
        page: u32,
        page_size: u32,
    ) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let skip = (page as usize - 1).saturating_mul(page_size as usize);
        Self {
            page,
            page_size,
            labels: labels.into_iter().skip(skip).take(page_size as usize).collect(),
            total,
        }
    }

    pub fn page_count(&self) -> u32 {
        let size = self.page_size.max(1) as usize;
        u32::try_from(self.total.div_ceil(size)).unwrap_or(u32::MAX)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_with(n: usize) -> Vault {
        let mut vault = Vault::new(UserId(1));
        for i in 0..n {
            vault.upsert(format!("label{i:02}"), "env");
        }
        vault
    }

    #[test]
    fn twenty_labels_make_three_pages() {
        let vault = vault_with(20);

        let first = vault.page(1, PAGE_SIZE);
        assert_eq!(first.labels.len(), 9);
        assert_eq!(first.labels[0], "label00");
        assert!(!first.has_prev());
        assert!(first.has_next());

        let second = vault.page(2, PAGE_SIZE);
        assert_eq!(second.labels[0], "label09");
        assert!(second.has_prev() && second.has_next());

        let last = vault.page(3, PAGE_SIZE);
        assert_eq!(last.labels, ["label18", "label19"]);
        assert!(last.has_prev());
        assert!(!last.has_next());
        assert_eq!(last.total, 20);
        assert_eq!(last.page_count(), 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = vault_with(3).page(5, PAGE_SIZE);
        assert!(page.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn page_zero_is_first_page() {
        let page = vault_with(3).page(0, PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.labels.len(), 3);
    }

    #[test]
    fn labels_sort_lexicographically() {
        let mut vault = Vault::new(UserId(1));
        for label in ["zeta", "Bank", "alpha", "bank"] {
            vault.upsert(label, "env");
        }
        assert_eq!(vault.page(1, PAGE_SIZE).labels, ["Bank", "alpha", "bank", "zeta"]);
    }

    #[test]
    fn upsert_replaces_and_remove_ignores_missing() {
        let mut vault = Vault::new(UserId(1));
        vault.upsert("bank", "one");
        vault.upsert("bank", "two");
        assert_eq!(vault.envelope("bank"), Some("two"));
        vault.remove("missing");
        vault.remove("bank");
        assert!(!vault.contains("bank"));
    }

    #[test]
    fn empty_vault_deserializes_without_entries() {
        let vault: Vault = serde_json::from_str(r#"{"user_id": 5}"#).unwrap();
        assert_eq!(vault, Vault::new(UserId(5)));
    }
}
