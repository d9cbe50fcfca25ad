//! Filter criteria and their query-string representation.
//!
//! The URL query string is the single source of truth for filter state
//! across reloads and shared links. Tags travel as human-readable slugs
//! derived from their titles, never as raw numeric ids, so links stay stable
//! when ids change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use url::form_urlencoded;

use crate::classify::resolve_time_range;
use crate::event::{EventRecord, Tag};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Slug↔id mapping built from tag metadata.
///
/// Absent metadata (an empty index) simply disables tag round-tripping:
/// slugs that cannot be resolved are dropped, not errors.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    id_by_slug: HashMap<String, i64>,
    slug_by_id: HashMap<i64, String>,
}

impl TagIndex {
    pub fn new(tags: &[Tag]) -> Self {
        let mut index = TagIndex::default();
        for tag in tags {
            let slug = slug::slugify(&tag.title);
            index.id_by_slug.insert(slug.clone(), tag.id);
            index.slug_by_id.insert(tag.id, slug);
        }
        index
    }

    pub fn id_for_slug(&self, slug: &str) -> Option<i64> {
        self.id_by_slug.get(slug).copied()
    }

    pub fn slug_for_id(&self, id: i64) -> Option<&str> {
        self.slug_by_id.get(&id).map(String::as_str)
    }
}

/// User-entered filter criteria. Absent field = criterion unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub title_query: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub tag_ids: Vec<i64>,
    pub free_only: bool,
    pub place: Option<String>,
    pub host: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.applied_count() == 0
    }

    /// Number of criteria a caller actually set; each selected tag counts
    /// individually. Drives the filter badge in the UI.
    pub fn applied_count(&self) -> usize {
        usize::from(!self.title_query.is_empty())
            + usize::from(self.from_date.is_some())
            + usize::from(self.to_date.is_some())
            + self.tag_ids.len()
            + usize::from(self.free_only)
            + usize::from(self.place.is_some())
            + usize::from(self.host.is_some())
    }

    /// Whether an event satisfies every set criterion.
    ///
    /// The title match is a case-insensitive substring test; the date bounds
    /// test for overlap with the event's resolved time range (from-bound at
    /// start of day, to-bound at end of day, matching how day-granular
    /// ranges are usually meant).
    pub fn matches(&self, event: &EventRecord) -> bool {
        if !self.title_query.is_empty()
            && !event
                .title
                .to_lowercase()
                .contains(&self.title_query.to_lowercase())
        {
            return false;
        }

        if self.from_date.is_some() || self.to_date.is_some() {
            let range = resolve_time_range(event);
            if let Some(from) = self.from_date {
                let from_start = from.and_hms_opt(0, 0, 0).expect("midnight is always valid").and_utc();
                if range.end < from_start {
                    return false;
                }
            }
            if let Some(to) = self.to_date {
                let to_end = to.and_hms_opt(23, 59, 59).expect("end of day is always valid").and_utc();
                if range.start > to_end {
                    return false;
                }
            }
        }

        if !self.tag_ids.iter().all(|id| event.tags.contains(id)) {
            return false;
        }

        if self.free_only && !event.is_free() {
            return false;
        }

        if let Some(place) = &self.place {
            if !event
                .town
                .as_deref()
                .is_some_and(|town| town.eq_ignore_ascii_case(place))
            {
                return false;
            }
        }

        if let Some(host) = &self.host {
            if !event
                .host
                .as_deref()
                .is_some_and(|h| h.eq_ignore_ascii_case(host))
            {
                return false;
            }
        }

        true
    }

    /// Serialize to a URL query string. Unset criteria emit no parameter.
    pub fn to_query(&self, tags: &TagIndex) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if !self.title_query.is_empty() {
            serializer.append_pair("title", &self.title_query);
        }
        if let Some(from) = self.from_date {
            serializer.append_pair("from", &from.format(DATE_FORMAT).to_string());
        }
        if let Some(to) = self.to_date {
            serializer.append_pair("to", &to.format(DATE_FORMAT).to_string());
        }

        let slugs: Vec<&str> = self
            .tag_ids
            .iter()
            .filter_map(|id| tags.slug_for_id(*id))
            .collect();
        if !slugs.is_empty() {
            serializer.append_pair("tags", &slugs.join(","));
        }

        if self.free_only {
            serializer.append_pair("free", "1");
        }
        if let Some(place) = &self.place {
            serializer.append_pair("place", place);
        }
        if let Some(host) = &self.host {
            serializer.append_pair("host", host);
        }

        serializer.finish()
    }

    /// Parse criteria from a URL query string. Unknown parameters are
    /// ignored; tag slugs missing from the index are dropped.
    pub fn from_query(query: &str, tags: &TagIndex) -> Self {
        let mut criteria = FilterCriteria::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "title" => criteria.title_query = value.into_owned(),
                "from" => {
                    criteria.from_date = NaiveDate::parse_from_str(&value, DATE_FORMAT).ok()
                }
                "to" => criteria.to_date = NaiveDate::parse_from_str(&value, DATE_FORMAT).ok(),
                "tags" => {
                    criteria.tag_ids = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .filter_map(|slug| {
                            let id = tags.id_for_slug(slug);
                            if id.is_none() {
                                warn!(slug, "dropping unresolvable tag slug from URL");
                            }
                            id
                        })
                        .collect();
                }
                "free" => criteria.free_only = value == "1",
                "place" => {
                    criteria.place = Some(value.into_owned()).filter(|s| !s.is_empty());
                }
                "host" => {
                    criteria.host = Some(value.into_owned()).filter(|s| !s.is_empty());
                }
                _ => {}
            }
        }

        criteria
    }
}
