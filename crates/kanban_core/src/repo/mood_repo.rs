//! Mood catalog and history repository.
//!
//! Tasks only carry an opaque mood label; this repository owns the keys the
//! mood picker reads and writes.

use super::RepoResult;
use crate::model::mood::{Mood, MoodHistoryItem};
use crate::model::ValidationError;
use crate::store::{
    read_collection, read_value, write_collection, write_value, PersistentStore, LAST_MOOD_KEY,
    MOODS_KEY, MOOD_HISTORY_KEY,
};
use chrono::{DateTime, Utc};

pub struct MoodRepository<'s, S: PersistentStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: PersistentStore + ?Sized> MoodRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn list_moods(&self) -> RepoResult<Vec<Mood>> {
        Ok(read_collection(self.store, MOODS_KEY)?)
    }

    /// Adds a mood to the catalog. A label that already exists keeps its
    /// stored color and is returned unchanged.
    pub fn add_mood(&self, label: &str, color: &str) -> RepoResult<Mood> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::BlankMoodLabel.into());
        }

        let mut moods = self.list_moods()?;
        if let Some(existing) = moods.iter().find(|mood| mood.label == label) {
            return Ok(existing.clone());
        }

        let mood = Mood {
            label: label.to_string(),
            color: color.to_string(),
        };
        moods.push(mood.clone());
        write_collection(self.store, MOODS_KEY, &moods)?;
        Ok(mood)
    }

    pub fn last_mood(&self) -> RepoResult<Option<String>> {
        Ok(read_value(self.store, LAST_MOOD_KEY)?)
    }

    /// Stores the last selected mood label; `None` forgets it.
    pub fn set_last_mood(&self, label: Option<&str>) -> RepoResult<()> {
        match label {
            Some(label) => write_value(self.store, LAST_MOOD_KEY, label)?,
            None => {
                self.store.remove(LAST_MOOD_KEY)?;
            }
        }
        Ok(())
    }

    /// Appends a selection of `mood` at `at` to the history.
    pub fn record_mood(&self, mood: &Mood, at: DateTime<Utc>) -> RepoResult<MoodHistoryItem> {
        let mut history = self.mood_history()?;
        let item = MoodHistoryItem {
            label: mood.label.clone(),
            color: mood.color.clone(),
            timestamp: at.timestamp_millis(),
        };
        history.push(item.clone());
        write_collection(self.store, MOOD_HISTORY_KEY, &history)?;
        Ok(item)
    }

    pub fn mood_history(&self) -> RepoResult<Vec<MoodHistoryItem>> {
        Ok(read_collection(self.store, MOOD_HISTORY_KEY)?)
    }
}
