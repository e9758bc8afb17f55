//! Lenient (de)serialization for optional task timestamps.
//!
//! Stored values are RFC 3339 strings with millisecond precision. On read,
//! plain calendar dates (`YYYY-MM-DD`) and `datetime-local` style values
//! (`YYYY-MM-DDTHH:MM`) are accepted as UTC. Anything else is dropped with a
//! warning instead of failing the whole collection.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(at) => serializer.serialize_str(&format_timestamp(*at)),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|value| {
        let parsed = parse_timestamp(value);
        if parsed.is_none() && !value.trim().is_empty() {
            warn!("event=timestamp_parse module=model status=dropped value_len={}", value.len());
        }
        parsed
    }))
}

/// Formats a timestamp the way it is persisted.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any accepted timestamp spelling.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(at.and_utc());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}
