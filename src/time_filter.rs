//! Status-bucket filtering and ordering of event collections.

use chrono::{DateTime, Utc};
use std::cmp::Reverse;

use crate::classify::{classify_range, resolve_time_range};
use crate::event::{EventRecord, EventStatus};

/// Filter a collection down to the events matching `status`, ordered for
/// display.
///
/// Upcoming events sort ascending by start instant (soonest first); current
/// and past events sort descending (most recent first). Both orderings are
/// stable: events with equal start instants keep their original relative
/// order. The input is never mutated.
pub fn filter_by_time(
    events: &[EventRecord],
    status: EventStatus,
    reference: DateTime<Utc>,
) -> Vec<EventRecord> {
    let mut bucket: Vec<(DateTime<Utc>, EventRecord)> = events
        .iter()
        .filter_map(|event| {
            let range = resolve_time_range(event);
            (classify_range(&range, reference) == status).then(|| (range.start, event.clone()))
        })
        .collect();

    match status {
        EventStatus::Upcoming => bucket.sort_by_key(|(start, _)| *start),
        EventStatus::Current | EventStatus::Past => {
            bucket.sort_by_key(|(start, _)| Reverse(*start))
        }
    }

    bucket.into_iter().map(|(_, event)| event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(slug: &str, start_date: &str, start_time: &str) -> EventRecord {
        EventRecord {
            id: None,
            slug: slug.to_string(),
            title: slug.to_string(),
            description: None,
            start_date: start_date.to_string(),
            start_time: Some(start_time.to_string()),
            end_date: None,
            end_time: None,
            image: None,
            address: None,
            town: None,
            host: None,
            price: None,
            tags: vec![],
        }
    }

    fn slugs(events: &[EventRecord]) -> Vec<&str> {
        events.iter().map(|e| e.slug.as_str()).collect()
    }

    #[test]
    fn test_upcoming_sorted_ascending() {
        let events = vec![
            event("later", "2024-06-10", "18:00"),
            event("soonest", "2024-06-02", "09:00"),
            event("middle", "2024-06-05", "12:00"),
            event("gone", "2024-05-01", "12:00"),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let upcoming = filter_by_time(&events, EventStatus::Upcoming, reference);
        assert_eq!(slugs(&upcoming), vec!["soonest", "middle", "later"]);
    }

    #[test]
    fn test_past_sorted_descending() {
        let events = vec![
            event("oldest", "2024-01-01", "10:00"),
            event("newest", "2024-05-01", "10:00"),
            event("between", "2024-03-01", "10:00"),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let past = filter_by_time(&events, EventStatus::Past, reference);
        assert_eq!(slugs(&past), vec!["newest", "between", "oldest"]);
    }

    #[test]
    fn test_equal_starts_keep_original_order() {
        let events = vec![
            event("first", "2024-06-02", "10:00"),
            event("second", "2024-06-02", "10:00"),
            event("third", "2024-06-02", "10:00"),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let upcoming = filter_by_time(&events, EventStatus::Upcoming, reference);
        assert_eq!(slugs(&upcoming), vec!["first", "second", "third"]);

        let past = filter_by_time(&events, EventStatus::Past, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(slugs(&past), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_input_is_untouched() {
        let events = vec![
            event("b", "2024-06-10", "18:00"),
            event("a", "2024-06-02", "09:00"),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let _ = filter_by_time(&events, EventStatus::Upcoming, reference);
        assert_eq!(slugs(&events), vec!["b", "a"]);
    }

    #[test]
    fn test_malformed_records_land_in_past_bucket() {
        // Epoch fallback means unparseable events classify as past, never
        // break the listing.
        let events = vec![
            event("broken", "not a date", ""),
            event("fine", "2024-06-02", "09:00"),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let upcoming = filter_by_time(&events, EventStatus::Upcoming, reference);
        assert_eq!(slugs(&upcoming), vec!["fine"]);

        let past = filter_by_time(&events, EventStatus::Past, reference);
        assert_eq!(slugs(&past), vec!["broken"]);
    }
}
