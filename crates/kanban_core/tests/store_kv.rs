use kanban_core::db::{open_db, open_db_in_memory, KV_SCHEMA_VERSION};
use kanban_core::store::{read_collection, StoreError, TASKS_KEY};
use kanban_core::{PersistentStore, SqliteStore};
use rusqlite::Connection;

#[test]
fn raw_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteStore::try_new(&conn) {
        Err(StoreError::SchemaMismatch { expected, found }) => {
            assert_eq!(found, 0);
            assert_eq!(expected, KV_SCHEMA_VERSION);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("raw connection must be rejected"),
    }
}

#[test]
fn stamped_connection_without_table_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {KV_SCHEMA_VERSION};"))
        .unwrap();
    assert!(matches!(
        SqliteStore::try_new(&conn),
        Err(StoreError::MissingKvTable)
    ));
}

#[test]
fn put_get_remove_round_trip_per_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    assert_eq!(store.get_raw("moods").unwrap(), None);
    store.put_raw("moods", "[]").unwrap();
    store.put_raw("moods", r##"[{"label":"Calm","color":"#fff"}]"##).unwrap();
    store.put_raw("lastMood", "\"Calm\"").unwrap();

    assert_eq!(
        store.get_raw("moods").unwrap().as_deref(),
        Some(r##"[{"label":"Calm","color":"#fff"}]"##)
    );

    assert!(store.remove("moods").unwrap());
    assert!(!store.remove("moods").unwrap());
    assert_eq!(store.get_raw("moods").unwrap(), None);
    assert_eq!(store.get_raw("lastMood").unwrap().as_deref(), Some("\"Calm\""));
}

#[test]
fn corrupt_task_collection_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    store.put_raw(TASKS_KEY, "[{\"id\": ").unwrap();

    let tasks: Vec<kanban_core::Task> = read_collection(&store, TASKS_KEY).unwrap();
    assert!(tasks.is_empty());
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kanban.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        store.put_raw("statusLabels", r#"["Backlog"]"#).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    assert_eq!(
        store.get_raw("statusLabels").unwrap().as_deref(),
        Some(r#"["Backlog"]"#)
    );
}
