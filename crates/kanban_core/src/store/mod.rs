//! Durable key-value namespace holding JSON collections.
//!
//! # Responsibility
//! - Define the `PersistentStore` contract shared by SQLite and in-memory
//!   backends.
//! - Encode/decode whole collections as JSON text under one key each.
//!
//! # Invariants
//! - Writes replace the full value stored under a key; there are no patches.
//! - No transaction spans multiple keys; the last writer for a key wins.
//! - A missing or corrupt entry reads back as "absent", never as an error.
//!   Only transport failures of the backend propagate.
//! - A bad record inside a collection drops that record only.

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the task collection.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the ordered board label list.
pub const BOARD_LABELS_KEY: &str = "statusLabels";
/// Key holding the mood catalog.
pub const MOODS_KEY: &str = "moods";
/// Key holding the last selected mood label.
pub const LAST_MOOD_KEY: &str = "lastMood";
/// Key holding the mood selection history.
pub const MOOD_HISTORY_KEY: &str = "moodHistory";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store backends.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection is not stamped with the kv layout this build writes.
    SchemaMismatch { expected: u32, found: u32 },
    /// Connection carries a version stamp but no kv table.
    MissingKvTable,
    /// A value could not be serialized before writing.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::SchemaMismatch { expected, found } => write!(
                f,
                "store requires kv schema version {expected}, found {found}"
            ),
            Self::MissingKvTable => write!(f, "store requires table `{}`", crate::db::KV_TABLE),
            Self::Encode { key, source } => {
                write!(f, "failed to encode value for key `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
            Self::SchemaMismatch { .. } | Self::MissingKvTable => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw text-level contract implemented by every backend.
///
/// Repositories receive a store handle at construction; nothing in core keeps
/// a process-wide store.
pub trait PersistentStore {
    /// Returns the raw JSON text stored under `key`, if any.
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Returns `false` when nothing was stored.
    fn remove(&self, key: &str) -> StoreResult<bool>;
}

/// Reads a JSON array under `key`, decoding each record on its own.
///
/// Returns `None` when the key is missing or its value is not a JSON array,
/// so callers can seed defaults for both cases alike. Records that do not
/// decode as `T` are logged and skipped; their siblings survive.
pub fn read_collection_opt<S, T>(store: &S, key: &str) -> StoreResult<Option<Vec<T>>>
where
    S: PersistentStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(records) = read_value::<S, Vec<serde_json::Value>>(store, key)? else {
        return Ok(None);
    };

    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value(record) {
            Ok(item) => items.push(item),
            Err(err) => warn!(
                "event=store_read module=store status=record_skipped key={key} index={index} error={err}"
            ),
        }
    }
    Ok(Some(items))
}

/// Reads a JSON array under `key`, falling back to an empty collection.
pub fn read_collection<S, T>(store: &S, key: &str) -> StoreResult<Vec<T>>
where
    S: PersistentStore + ?Sized,
    T: DeserializeOwned,
{
    Ok(read_collection_opt(store, key)?.unwrap_or_default())
}

/// Replaces the collection stored under `key`.
pub fn write_collection<S, T>(store: &S, key: &str, items: &[T]) -> StoreResult<()>
where
    S: PersistentStore + ?Sized,
    T: Serialize,
{
    write_value(store, key, items)
}

/// Reads one JSON value under `key`. Corrupt entries are logged and treated
/// as missing.
pub fn read_value<S, T>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    S: PersistentStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get_raw(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(
                "event=store_read module=store status=corrupt key={key} bytes={} error={err}",
                raw.len()
            );
            Ok(None)
        }
    }
}

/// Serializes `value` and replaces whatever `key` held.
pub fn write_value<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: PersistentStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.put_raw(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::{read_collection, read_collection_opt, write_collection, MemoryStore, PersistentStore};

    #[test]
    fn missing_key_reads_as_empty_collection() {
        let store = MemoryStore::new();
        let items: Vec<String> = read_collection(&store, "nothing").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn corrupt_value_reads_as_missing() {
        let store = MemoryStore::new();
        store.put_raw("tasks", "{not json").unwrap();

        let items: Option<Vec<String>> = read_collection_opt(&store, "tasks").unwrap();
        assert!(items.is_none());
    }

    #[test]
    fn undecodable_records_are_skipped_individually() {
        let store = MemoryStore::new();
        store
            .put_raw("labels", r#"["Todo", 7, {"nested": true}, "Done"]"#)
            .unwrap();

        let items: Vec<String> = read_collection(&store, "labels").unwrap();
        assert_eq!(items, vec!["Todo".to_string(), "Done".to_string()]);
    }

    #[test]
    fn non_array_value_reads_as_missing() {
        let store = MemoryStore::new();
        store.put_raw("labels", r#"{"Todo": 0}"#).unwrap();

        let items: Option<Vec<String>> = read_collection_opt(&store, "labels").unwrap();
        assert!(items.is_none());
    }

    #[test]
    fn write_replaces_whole_collection() {
        let store = MemoryStore::new();
        write_collection(&store, "labels", &["a".to_string(), "b".to_string()]).unwrap();
        write_collection(&store, "labels", &["c".to_string()]).unwrap();

        let items: Vec<String> = read_collection(&store, "labels").unwrap();
        assert_eq!(items, vec!["c".to_string()]);
    }
}
