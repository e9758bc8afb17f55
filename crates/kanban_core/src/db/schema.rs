//! Layout of the key-value table.
//!
//! There is exactly one table and one layout version. A blank file gets the
//! table and its version stamp in one transaction.

use super::{DbError, DbResult};
use rusqlite::Connection;
use std::cmp::Ordering;

/// Layout version written to `PRAGMA user_version`.
pub const KV_SCHEMA_VERSION: u32 = 1;
/// Name of the table holding every store key.
pub const KV_TABLE: &str = "kv_entries";

const KV_TABLE_SQL: &str = include_str!("kv_entries.sql");

/// What `ensure_kv_schema` found on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Created,
    Current,
}

impl SchemaState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Current => "current",
        }
    }
}

/// Reads the kv layout version stamped on `conn`; `0` for a blank file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Returns whether `conn` holds the kv table.
pub fn has_kv_table(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn ensure_kv_schema(conn: &mut Connection) -> DbResult<SchemaState> {
    let found = schema_version(conn)?;
    match found.cmp(&KV_SCHEMA_VERSION) {
        Ordering::Equal => Ok(SchemaState::Current),
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: KV_SCHEMA_VERSION,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_TABLE_SQL)?;
            tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
            tx.commit()?;
            Ok(SchemaState::Created)
        }
    }
}
