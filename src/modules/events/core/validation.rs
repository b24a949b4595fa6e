use crate::modules::events::core::event::{Category, PublicEvent};
use chrono::{DateTime, NaiveDate, NaiveTime};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Calendar date of an event. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Strict 24-hour `HH:MM`.
pub fn parse_event_time(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Field-level checks. An empty list means the event is valid.
pub fn validate(event: &PublicEvent) -> Vec<String> {
    let details = &event.details;
    let mut errors = Vec::new();

    if details.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }

    if details.date.trim().is_empty() {
        errors.push("Date is required".to_string());
    } else if parse_event_date(&details.date).is_none() {
        errors.push(format!("Invalid date: {}", details.date));
    }

    if let Some(time) = &details.time {
        if parse_event_time(time).is_none() {
            errors.push(format!("Invalid time format (expected HH:MM): {time}"));
        }
    }

    if !(MIN_SCORE..=MAX_SCORE).contains(&details.score) {
        errors.push(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {}",
            details.score
        ));
    }

    if details.category == Category::Unrecognized {
        errors.push("Category must be benefic, challenging or neutral".to_string());
    }

    errors
}
