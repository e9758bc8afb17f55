//! Mood selections laid out over time.
//!
//! Each history entry becomes one point: its calendar day (UTC) and its
//! time of day as fractional hours. Points are grouped per label for
//! plotting one series per mood.

use crate::model::mood::MoodHistoryItem;
use chrono::{DateTime, NaiveDate, Timelike};
use log::warn;
use serde::Serialize;

/// One mood selection placed on a day/hour grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPoint {
    pub label: String,
    pub color: String,
    pub date: NaiveDate,
    /// Hour of day in `[0, 24)`, minutes as the fraction.
    pub hour: f64,
    /// `HH:MM`.
    pub time_label: String,
}

/// All points of one label. `color` is the last color recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<MoodPoint>,
}

/// Places every history entry on the grid, in history order.
///
/// Entries whose timestamp is outside chrono's range are skipped.
pub fn mood_timeline(history: &[MoodHistoryItem]) -> Vec<MoodPoint> {
    history
        .iter()
        .filter_map(|item| {
            let Some(at) = DateTime::from_timestamp_millis(item.timestamp) else {
                warn!(
                    "event=mood_timeline module=report status=skipped timestamp={}",
                    item.timestamp
                );
                return None;
            };
            Some(MoodPoint {
                label: item.label.clone(),
                color: item.color.clone(),
                date: at.date_naive(),
                hour: f64::from(at.hour()) + f64::from(at.minute()) / 60.0,
                time_label: at.format("%H:%M").to_string(),
            })
        })
        .collect()
}

/// Groups the timeline per label, labels in first-seen order.
pub fn mood_series(history: &[MoodHistoryItem]) -> Vec<MoodSeries> {
    let mut series: Vec<MoodSeries> = Vec::new();
    for point in mood_timeline(history) {
        match series.iter_mut().find(|entry| entry.label == point.label) {
            Some(entry) => {
                entry.color.clone_from(&point.color);
                entry.points.push(point);
            }
            None => series.push(MoodSeries {
                label: point.label.clone(),
                color: point.color.clone(),
                points: vec![point],
            }),
        }
    }
    series
}
