//! Temporal classification of events.
//!
//! Every event resolves to a `TimeRange` and is classified against a
//! reference instant as upcoming, current or past. Resolution is total:
//! records whose date fields fail every fallback land on the Unix epoch and
//! therefore classify as past.

use chrono::{DateTime, Duration, Utc};

use crate::datetime::{first_instant, normalize};
use crate::event::{EventRecord, EventStatus};

/// Resolved start/end instants for one event. Ephemeral: recomputed per
/// classification call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Always non-negative: `end` is clamped to `start` on resolution.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Resolve an event's temporal fields into a concrete range.
///
/// Start falls back from (startDate, startTime) to the end fields, and as a
/// last resort to the Unix epoch. End falls back to start. An end earlier
/// than start is clamped to start, so the range is never negative.
pub fn resolve_time_range(event: &EventRecord) -> TimeRange {
    let end_date = event.end_date.as_deref().or(Some(event.start_date.as_str()));
    let end_time = event.end_time.as_deref().or(event.start_time.as_deref());

    let start = first_instant([
        (Some(event.start_date.as_str()), event.start_time.as_deref()),
        (end_date, end_time),
    ])
    .unwrap_or(DateTime::UNIX_EPOCH);

    let end = normalize(end_date, end_time).unwrap_or(start).max(start);

    TimeRange { start, end }
}

/// Classify an event relative to a reference instant.
///
/// `current` is inclusive on both boundaries: an event whose start equals its
/// end is current for exactly that one instant.
pub fn classify(event: &EventRecord, reference: DateTime<Utc>) -> EventStatus {
    classify_range(&resolve_time_range(event), reference)
}

pub fn classify_range(range: &TimeRange, reference: DateTime<Utc>) -> EventStatus {
    if range.start > reference {
        EventStatus::Upcoming
    } else if range.end < reference {
        EventStatus::Past
    } else {
        EventStatus::Current
    }
}
