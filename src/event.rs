//! Backend-neutral event record types.
//!
//! These types mirror what the persistence collaborator returns. The engine
//! treats records as read-only input: temporal fields stay loose strings and
//! are normalized on demand, never rewritten in place.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EventListError, EventListResult};

/// An event record as returned by the persistence collaborator.
///
/// Date and time fields are free-form strings (`"2024-06-01"`, `"18:00"`);
/// see the `datetime` module for how they become instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Backend id; some backends send numbers, some strings.
    #[serde(default, deserialize_with = "id_from_number_or_string")]
    pub id: Option<String>,
    /// URL-safe unique identifier, used for routing.
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    /// Free-form price string; `"0"` denotes a free event.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl EventRecord {
    /// Decode a collaborator payload of event records.
    pub fn from_json_array(content: &str) -> EventListResult<Vec<EventRecord>> {
        serde_json::from_str(content).map_err(|e| EventListError::Serialization(e.to_string()))
    }

    /// Key used for merge deduplication: id when present, slug otherwise.
    pub fn dedup_key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.slug)
    }

    pub fn is_free(&self) -> bool {
        self.price.as_deref() == Some("0")
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid event id: {other}"
        ))),
    }
}

/// Tag metadata, used only for slug↔id mapping in filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub title: String,
}

/// Temporal status of an event relative to a reference instant.
///
/// The three statuses are mutually exclusive: every event is exactly one of
/// them for any given reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Current,
    Past,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Current => "current",
            EventStatus::Past => "past",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "current" => Ok(EventStatus::Current),
            "past" => Ok(EventStatus::Past),
            other => Err(format!("Unknown event status: {other}")),
        }
    }
}
