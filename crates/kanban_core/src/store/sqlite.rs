//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Only connections opened through `db::open_db*` (kv table present at
//!   `KV_SCHEMA_VERSION`) are accepted.
//! - One row per key; `put_raw` upserts and bumps `updated_at`.

use super::{PersistentStore, StoreError, StoreResult};
use crate::db::schema::has_kv_table;
use crate::db::{schema_version, KV_SCHEMA_VERSION};
use rusqlite::{params, Connection, OptionalExtension};

/// Store handle borrowing one prepared SQLite connection.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps `conn` after checking its kv schema.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersistentStore for SqliteStore<'_> {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let found = schema_version(conn)?;
    if found != KV_SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            expected: KV_SCHEMA_VERSION,
            found,
        });
    }
    if !has_kv_table(conn)? {
        return Err(StoreError::MissingKvTable);
    }
    Ok(())
}
