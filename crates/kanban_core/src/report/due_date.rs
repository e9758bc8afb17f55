//! Due-date classification for notifications.
//!
//! # Invariants
//! - Pure over `(task, now)`; never reads the clock.
//! - Tasks on the terminal board always classify as `None`.
//! - Overdue is compared at UTC calendar-day granularity; near-deadline uses
//!   the exact remaining duration.

use crate::model::task::Task;
use chrono::{DateTime, Duration, Utc};

/// Notification class of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueClass {
    /// Due date is today or already passed.
    OverdueOrDueToday,
    /// Due within the next 24 hours, but not today.
    NearDeadline,
    None,
}

/// Classifies `task` against `now`. `done_board` names the terminal board.
pub fn classify(task: &Task, now: DateTime<Utc>, done_board: &str) -> DueClass {
    if task.in_status(done_board) {
        return DueClass::None;
    }
    let Some(due) = task.due_date else {
        return DueClass::None;
    };

    if due.date_naive() <= now.date_naive() {
        return DueClass::OverdueOrDueToday;
    }

    let remaining = due - now;
    if remaining > Duration::zero() && remaining <= Duration::hours(24) {
        return DueClass::NearDeadline;
    }
    DueClass::None
}

/// Tasks that warrant a notification, in storage order.
///
/// The length of the result is the badge count.
pub fn notifications<'a>(tasks: &'a [Task], now: DateTime<Utc>, done_board: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| classify(task, now, done_board) != DueClass::None)
        .collect()
}
