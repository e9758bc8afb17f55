//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record (camelCase JSON under the `tasks` key).
//! - Define the explicit create request (`NewTask`) and partial update
//!   (`TaskPatch`) shapes.
//!
//! # Invariants
//! - `id` is generated once and never reassigned.
//! - `created_date` is stamped once at creation and never patched.
//! - `status` is never patched directly: `TaskPatch` only carries `board_id`
//!   and the repository derives `status` from the resolved board.

use super::board::BoardId;
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Priority given to tasks created without one.
pub const DEFAULT_PRIORITY: &str = "Medium";
/// Task type given to tasks created without one.
pub const DEFAULT_TASK_TYPE: &str = "Study";

/// Stable task identifier (UUID v4 text for generated ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier, e.g. one read back from a drag event.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One checklist line attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Requirement {
    /// Creates an unchecked requirement with a generated id.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::BlankRequirementText);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            done: false,
        })
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Title of the owning board. Kept in lockstep with `board_id`.
    pub status: String,
    #[serde(default)]
    pub board_id: BoardId,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub task_type: String,
    /// Zero-based position inside the status group. `None` only for legacy
    /// records that predate ordering; the normalizer fills it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::model::timestamp")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::model::timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::model::timestamp")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::model::timestamp")]
    pub actual_done_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl Task {
    /// Returns whether this task sits in the group of `status`.
    pub fn in_status(&self, status: &str) -> bool {
        self.status == status
    }

    /// Order used for sorting; legacy records without one sort first.
    pub fn order_key(&self) -> u32 {
        self.order.unwrap_or(0)
    }

    /// Applies every non-board field carried by `patch`.
    pub(crate) fn merge_fields(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(priority) = &patch.priority {
            self.priority = priority.clone();
        }
        if let Some(task_type) = &patch.task_type {
            self.task_type = task_type.clone();
        }
        if let Some(order) = patch.order {
            self.order = Some(order);
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(actual_done_date) = patch.actual_done_date {
            self.actual_done_date = actual_done_date;
        }
        if let Some(requirements) = &patch.requirements {
            self.requirements = requirements.clone();
        }
        if let Some(mood) = &patch.mood {
            self.mood = mood.clone();
        }
    }
}

/// Create request for a task.
///
/// `order` and `created_date` are optional; the repository fills them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub board_id: BoardId,
    pub priority: String,
    pub task_type: String,
    /// Position in the board's group. Siblings at or after it shift down;
    /// values past the end append.
    pub order: Option<u32>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_date: Option<DateTime<Utc>>,
    pub requirements: Vec<Requirement>,
    pub mood: Option<String>,
}

impl NewTask {
    /// Request with default priority/type and no dates.
    pub fn new(title: impl Into<String>, board_id: BoardId) -> Self {
        Self {
            title: title.into(),
            board_id,
            priority: DEFAULT_PRIORITY.to_string(),
            task_type: DEFAULT_TASK_TYPE.to_string(),
            order: None,
            start_date: None,
            due_date: None,
            created_date: None,
            requirements: Vec::new(),
            mood: None,
        }
    }
}

/// Partial update for a task.
///
/// Outer `None` leaves a field untouched. For clearable fields the inner
/// `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    /// Moves the task to another board; `status` follows the board title.
    pub board_id: Option<BoardId>,
    pub priority: Option<String>,
    pub task_type: Option<String>,
    /// Position inside the task's group after any board change. The group
    /// is renumbered around it.
    pub order: Option<u32>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub actual_done_date: Option<Option<DateTime<Utc>>>,
    pub requirements: Option<Vec<Requirement>>,
    pub mood: Option<Option<String>>,
}

impl TaskPatch {
    /// Returns whether applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
