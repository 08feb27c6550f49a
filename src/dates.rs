//! Date labels and intake timestamps.
//!
//! Preference dates are compared as text in `M/D/YYYY` form (no zero
//! padding), so every date the planner emits goes through [`format_date`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

const SECONDS_PER_DAY: i64 = 86_400;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Formats a date the way preference columns store it, e.g. `3/5/2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Parses a preference date.
///
/// Accepts `M/D/YYYY`, `M/D/YY` (20xx) and ISO `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains('/') {
        let year = text.rsplit('/').next().unwrap_or("");
        let format = if year.len() == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
        return NaiveDate::parse_from_str(text, format).ok();
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Parses a submission timestamp. Date-only values map to midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }

    parse_date(text).map(|date| date.and_time(NaiveTime::MIN))
}

/// Whole days elapsed from `from` to `now`, floored.
///
/// A timestamp one hour in the future yields `-1`, not `0`.
pub fn days_between(from: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Days a request has been waiting, if its timestamp can be read.
pub fn days_waiting(submitted_at: Option<&str>, now: NaiveDateTime) -> Option<i64> {
    submitted_at
        .and_then(parse_timestamp)
        .map(|submitted| days_between(submitted, now))
}
