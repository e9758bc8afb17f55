//! In-memory store used by tests and throwaway sessions.

use super::{PersistentStore, StoreResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// Single-threaded in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw value under `key`; handy for byte-level
    /// assertions in tests.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PersistentStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}
