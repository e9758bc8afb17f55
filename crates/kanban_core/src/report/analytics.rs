//! Read-only task statistics.
//!
//! # Responsibility
//! - Aggregate task counts per status and per priority.
//! - Classify completed tasks as early, on time or late.
//! - Compute planned vs actual durations in whole days.
//!
//! # Invariants
//! - Never mutates tasks; `now` is always supplied by the caller.
//! - Label counts keep first-seen order so charts stay stable.

use crate::model::task::Task;
use chrono::{DateTime, Utc};
use serde::Serialize;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Number of tasks sharing one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Task counts per status, in first-seen order.
pub fn count_by_status(tasks: &[Task]) -> Vec<LabelCount> {
    count_by(tasks, |task| task.status.as_str())
}

/// Task counts per priority, in first-seen order.
pub fn count_by_priority(tasks: &[Task]) -> Vec<LabelCount> {
    count_by(tasks, |task| task.priority.as_str())
}

fn count_by<'a>(tasks: &'a [Task], key: impl Fn(&'a Task) -> &'a str) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for task in tasks {
        let label = key(task);
        match counts.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// Completion counts for tasks on the terminal board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timeliness {
    pub late: usize,
    pub on_time: usize,
    pub early: usize,
}

/// Classifies done tasks that carry both a due and a completion date.
///
/// Finishing on the due calendar day (UTC) counts as on time even when the
/// completion instant is later than the due instant.
pub fn completion_timeliness(tasks: &[Task], done_board: &str) -> Timeliness {
    let mut summary = Timeliness::default();
    for task in tasks.iter().filter(|task| task.in_status(done_board)) {
        let (Some(done), Some(due)) = (task.actual_done_date, task.due_date) else {
            continue;
        };
        if done.date_naive() == due.date_naive() {
            summary.on_time += 1;
        } else if done > due {
            summary.late += 1;
        } else {
            summary.early += 1;
        }
    }
    summary
}

/// Planned vs actual duration of one task, in whole days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationRow {
    pub title: String,
    pub due_days: i64,
    pub actual_days: i64,
    /// Whether `actual_days` ran up to `now` because the task is unfinished.
    pub in_progress: bool,
}

/// Durations measured from each task's start point.
///
/// The start point is the creation date, else the start date, else `now`.
/// A missing due date collapses to the start point, and a missing completion
/// date runs to `now`. Values are rounded and never negative.
pub fn due_vs_actual(tasks: &[Task], now: DateTime<Utc>) -> Vec<DurationRow> {
    tasks
        .iter()
        .map(|task| {
            let start = task.created_date.or(task.start_date).unwrap_or(now);
            let due = task.due_date.unwrap_or(start);
            let actual = task.actual_done_date.unwrap_or(now);
            DurationRow {
                title: task.title.clone(),
                due_days: whole_days(start, due),
                actual_days: whole_days(start, actual),
                in_progress: task.actual_done_date.is_none(),
            }
        })
        .collect()
}

fn whole_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let days = (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY;
    (days.round() as i64).max(0)
}
