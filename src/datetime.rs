//! Loose date/time string normalization.
//!
//! Backends and submission forms deliver dates as free-form strings:
//! `"2024-06-01"`, `"2024-06-01 18:00:00"`, time fields like `"18:00"` or
//! `"18"`. Everything here fails soft: a value that cannot be made into an
//! instant becomes `None`, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Accepted layouts for a combined date-time string, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a date string plus optional time string into an instant.
///
/// A date string that already carries a time component (a space or a `T`
/// separator) is treated as self-contained and the time string is ignored.
/// Otherwise the normalized time component is appended, defaulting to
/// midnight.
pub fn normalize(date_str: Option<&str>, time_str: Option<&str>) -> Option<DateTime<Utc>> {
    let date = date_str?.trim();
    if date.is_empty() {
        return None;
    }

    if date.contains(' ') || date.contains('T') {
        return parse_instant(date);
    }

    parse_instant(&format!("{}T{}", date, normalize_time(time_str)))
}

/// Normalize a time-of-day string to zero-padded `HH:MM:SS`.
///
/// The input is split on `:` and each segment parsed as an integer; segments
/// that fail to parse count as 0, as do missing segments. An absent or blank
/// input means midnight.
pub fn normalize_time(time_str: Option<&str>) -> String {
    let raw = match time_str.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return "00:00:00".to_string(),
    };

    let mut segments = raw.split(':');
    let hours = int_segment(segments.next());
    let minutes = int_segment(segments.next());
    let seconds = int_segment(segments.next());

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

fn int_segment(segment: Option<&str>) -> u32 {
    segment
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Evaluate an ordered list of (date, time) fallback candidates, returning
/// the first one that normalizes to an instant.
pub fn first_instant<'a, I>(candidates: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    candidates
        .into_iter()
        .find_map(|(date, time)| normalize(date, time))
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }

    // RFC3339 input carries its own offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Bare date without a time component (e.g. from a self-contained string
    // that still had no clock part after a space was trimmed away)
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight is always valid").and_utc())
}
