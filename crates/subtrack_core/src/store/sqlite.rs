//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Each `set` is a single UPSERT statement, so a key is either fully
//!   rewritten or left untouched.
//! - The connection is guarded by a mutex; the store is `Sync` even though
//!   `rusqlite::Connection` is not.

use super::{KeyValueStore, StoreResult};
use crate::db::{open_db, open_db_in_memory, DbResult};
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) a database file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| {
                error!("event=kv_get module=store status=error key={key} error={err}");
                err
            })?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map_err(|err| {
                error!("event=kv_set module=store status=error key={key} error={err}");
                err
            })?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.conn()
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])
            .map_err(|err| {
                error!("event=kv_delete module=store status=error key={key} error={err}");
                err
            })?;
        Ok(())
    }
}
