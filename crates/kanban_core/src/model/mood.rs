//! Mood records consumed by the mood-tagging collaborator.
//!
//! Core never interprets a task's `mood`; these shapes only describe what the
//! mood catalog and history keys hold.

use serde::{Deserialize, Serialize};

/// Catalog entry: a label and the color it is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub label: String,
    pub color: String,
}

/// One mood selection, stamped in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodHistoryItem {
    pub label: String,
    pub color: String,
    pub timestamp: i64,
}
