//! Read-only views derived from the task set and mood history.
//!
//! Notification classification, analytics and the mood timeline never
//! write; callers pass the snapshot and the current time.

pub mod analytics;
pub mod due_date;
pub mod mood;

pub use analytics::{
    completion_timeliness, count_by_priority, count_by_status, due_vs_actual, DurationRow,
    LabelCount, Timeliness,
};
pub use due_date::{classify, notifications, DueClass};
pub use mood::{mood_series, mood_timeline, MoodPoint, MoodSeries};
