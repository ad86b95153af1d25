// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and schema.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::time::Duration;

use pwguard_config::validation::is_identifier;
use pwguard_core::PwguardError;
use tracing::debug;

/// In-memory database marker accepted as `store.url`.
pub const MEMORY_URL: &str = ":memory:";

/// An open vault database bound to one table.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    table: String,
}

impl Database {
    /// Opens (or creates) the database at `url` and ensures the vault table exists.
    pub async fn open(url: &str, table: &str) -> Result<Self, PwguardError> {
        if !is_identifier(table) {
            return Err(PwguardError::Config(format!(
                "`{table}` is not a valid table name"
            )));
        }

        let conn = if url == MEMORY_URL {
            tokio_rusqlite::Connection::open_in_memory().await
        } else {
            tokio_rusqlite::Connection::open(url).await
        }
        .map_err(PwguardError::storage)?;

        let in_memory = url == MEMORY_URL;
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if !in_memory {
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                debug!(mode, "journal mode set");
            }
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        let db = Self {
            conn,
            table: table.to_string(),
        };
        db.ensure_schema().await?;
        debug!(url, table, "vault database opened");
        Ok(db)
    }

    /// Creates the vault table and its unique index if missing.
    pub async fn ensure_schema(&self) -> Result<(), PwguardError> {
        let table = self.table.clone();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&format!(
                    "CREATE TABLE IF NOT EXISTS \"{table}\" (
                         identifier INTEGER NOT NULL,
                         entries    TEXT    NOT NULL DEFAULT '{{}}'
                     );
                     CREATE UNIQUE INDEX IF NOT EXISTS \"{table}_identifier\"
                         ON \"{table}\" (identifier);"
                ))
            })
            .await
            .map_err(map_tr_err)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// The validated table name, safe to splice into SQL.
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Maps a tokio-rusqlite failure to a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PwguardError {
    PwguardError::storage(e)
}
