// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault document operations.
//!
//! Each row holds one user's `identifier` and a JSON object mapping labels to
//! ciphertext envelopes.

use std::collections::BTreeMap;

use pwguard_core::{LabelPage, PwguardError, UserId, Vault};
use rusqlite::{ErrorCode, OptionalExtension, params};

use crate::database::{Database, map_tr_err};

type Entries = BTreeMap<String, String>;

fn decode_entries(json: &str) -> Result<Entries, rusqlite::Error> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn encode_entries(entries: &Entries) -> Result<String, rusqlite::Error> {
    serde_json::to_string(entries).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Loads a user's vault, or `None` when the user has none.
pub async fn get_vault(db: &Database, user_id: UserId) -> Result<Option<Vault>, PwguardError> {
    let sql = format!("SELECT entries FROM \"{}\" WHERE identifier = ?1", db.table());
    let entries = db
        .connection()
        .call(move |conn| -> Result<Option<Entries>, rusqlite::Error> {
            let json: Option<String> = conn
                .query_row(&sql, params![user_id.0], |row| row.get(0))
                .optional()?;
            json.as_deref().map(decode_entries).transpose()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(entries.map(|entries| Vault { user_id, entries }))
}

/// Inserts a new vault. Returns `false` if the user already has one.
pub async fn insert_vault(db: &Database, vault: &Vault) -> Result<bool, PwguardError> {
    let sql = format!(
        "INSERT INTO \"{}\" (identifier, entries) VALUES (?1, ?2)",
        db.table()
    );
    let user_id = vault.user_id;
    let entries = vault.entries.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let json = encode_entries(&entries)?;
            match conn.execute(&sql, params![user_id.0, json]) {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Adds or replaces one entry, creating the vault row when missing.
pub async fn upsert_entry(
    db: &Database,
    user_id: UserId,
    label: &str,
    envelope: &str,
) -> Result<(), PwguardError> {
    let table = db.table().to_string();
    let label = label.to_string();
    let envelope = envelope.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            let current: Option<String> = tx
                .query_row(
                    &format!("SELECT entries FROM \"{table}\" WHERE identifier = ?1"),
                    params![user_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let mut entries = current.as_deref().map(decode_entries).transpose()?.unwrap_or_default();
            entries.insert(label, envelope);
            tx.execute(
                &format!(
                    "INSERT INTO \"{table}\" (identifier, entries) VALUES (?1, ?2)
                     ON CONFLICT (identifier) DO UPDATE SET entries = excluded.entries"
                ),
                params![user_id.0, encode_entries(&entries)?],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Removes one entry. A missing vault or label leaves the table untouched.
pub async fn delete_entry(db: &Database, user_id: UserId, label: &str) -> Result<(), PwguardError> {
    let table = db.table().to_string();
    let label = label.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            let current: Option<String> = tx
                .query_row(
                    &format!("SELECT entries FROM \"{table}\" WHERE identifier = ?1"),
                    params![user_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(json) = current else {
                return Ok(());
            };
            let mut entries = decode_entries(&json)?;
            if entries.remove(&label).is_some() {
                tx.execute(
                    &format!("UPDATE \"{table}\" SET entries = ?2 WHERE identifier = ?1"),
                    params![user_id.0, encode_entries(&entries)?],
                )?;
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Lists one page of labels in ascending byte order, or `None` when the
/// user has no vault.
pub async fn list_labels_page(
    db: &Database,
    user_id: UserId,
    page: u32,
    page_size: u32,
) -> Result<Option<LabelPage>, PwguardError> {
    let table = db.table().to_string();
    let page = page.max(1);
    let page_size = page_size.max(1);
    let offset = i64::from(page - 1) * i64::from(page_size);

    let found = db
        .connection()
        .call(move |conn| -> Result<Option<(i64, Vec<String>)>, rusqlite::Error> {
            let total: Option<i64> = conn
                .query_row(
                    &format!(
                        "SELECT (SELECT COUNT(*) FROM json_each(v.entries))
                         FROM \"{table}\" v WHERE v.identifier = ?1"
                    ),
                    params![user_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(total) = total else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(&format!(
                "SELECT j.key FROM \"{table}\" v, json_each(v.entries) j
                 WHERE v.identifier = ?1
                 ORDER BY j.key
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let labels = stmt
                .query_map(params![user_id.0, i64::from(page_size), offset], |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some((total, labels)))
        })
        .await
        .map_err(map_tr_err)?;

    Ok(found.map(|(total, labels)| LabelPage {
        page,
        page_size,
        labels,
        total: usize::try_from(total).unwrap_or_default(),
    }))
}
