//! Core engine for a localized events listing.
//!
//! This crate provides the temporal-status and filtering logic behind an
//! event listing view:
//! - `datetime`: loose date/time string normalization with fallback chains
//! - `classify`: upcoming/current/past classification against a reference
//!   instant
//! - `time_filter`: status buckets with status-specific ordering
//! - `filters` / `filter_state`: URL-synchronized filter criteria with
//!   debounced text input
//! - `loader`: incremental page loading with dedup merge, switching to a
//!   full fetch once filters need exact totals
//!
//! Persistence, tag metadata and the URL bar itself are collaborators: the
//! engine consumes them through `loader::EventSource`, `event::Tag` slices
//! and plain query strings.

pub mod classify;
pub mod config;
pub mod datetime;
pub mod debounce;
pub mod error;
pub mod event;
pub mod filter_state;
pub mod filters;
pub mod loader;
pub mod time_filter;

pub use classify::{TimeRange, classify, resolve_time_range};
pub use config::ListingConfig;
pub use debounce::Debouncer;
pub use error::{EventListError, EventListResult};
pub use event::{EventRecord, EventStatus, Tag};
pub use filter_state::FilterState;
pub use filters::{FilterCriteria, TagIndex};
pub use loader::{EventLoader, EventSource};
pub use time_filter::filter_by_time;
