//! Owner of live filter state and its URL synchronization.
//!
//! One instance per listing view. Criteria are parsed from the URL exactly
//! once (deferred until tag metadata is available), mutated only through the
//! setters here, and written back through a single idempotent path that
//! skips redundant navigation entries.

use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::ListingConfig;
use crate::debounce::Debouncer;
use crate::event::Tag;
use crate::filters::{FilterCriteria, TagIndex};

#[derive(Debug)]
pub struct FilterState {
    criteria: FilterCriteria,
    tags: TagIndex,
    debouncer: Debouncer,
    title_input: String,
    initialized: bool,
    last_written: Option<String>,
}

impl FilterState {
    pub fn new(config: &ListingConfig) -> Self {
        FilterState {
            criteria: FilterCriteria::default(),
            tags: TagIndex::default(),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            title_input: String::new(),
            initialized: false,
            last_written: None,
        }
    }

    /// Parse criteria from the current URL's query string.
    ///
    /// Runs exactly once per view: later calls are no-ops so an in-flight
    /// edit is never clobbered by a late-arriving tag metadata response.
    /// Callers defer this until tag metadata is available; slugs that don't
    /// resolve against it are dropped.
    pub fn init_from_query(&mut self, query: &str, tags: &[Tag]) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        self.tags = TagIndex::new(tags);
        self.criteria = FilterCriteria::from_query(query, &self.tags);
        self.title_input = self.criteria.title_query.clone();

        // Writing the just-parsed state back would be a redundant navigation
        self.last_written = Some(self.criteria.to_query(&self.tags));
        debug!(query, applied = self.criteria.applied_count(), "filter state initialized from URL");
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Raw title text as typed, ahead of the debounce.
    pub fn title_input(&self) -> &str {
        &self.title_input
    }

    /// Record a keystroke in the title filter. The value becomes a criterion
    /// only after the debounce quantum elapses (see `tick`), except that
    /// clearing the field applies immediately.
    pub fn set_title_input(&mut self, value: &str, now: Instant) {
        self.title_input = value.to_string();
        if let Some(flushed) = self.debouncer.submit(value, now) {
            self.criteria.title_query = flushed;
        }
    }

    /// Advance the debounce clock; applies a pending title value whose
    /// quantum has elapsed. Returns true if the criteria changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(value) if value != self.criteria.title_query => {
                self.criteria.title_query = value;
                true
            }
            Some(_) => false,
            None => false,
        }
    }

    pub fn set_from_date(&mut self, date: Option<NaiveDate>) {
        self.criteria.from_date = date;
    }

    pub fn set_to_date(&mut self, date: Option<NaiveDate>) {
        self.criteria.to_date = date;
    }

    pub fn toggle_tag(&mut self, id: i64) {
        if let Some(pos) = self.criteria.tag_ids.iter().position(|t| *t == id) {
            self.criteria.tag_ids.remove(pos);
        } else {
            self.criteria.tag_ids.push(id);
        }
    }

    pub fn set_free_only(&mut self, free_only: bool) {
        self.criteria.free_only = free_only;
    }

    pub fn set_place(&mut self, place: Option<String>) {
        self.criteria.place = place.filter(|p| !p.is_empty());
    }

    pub fn set_host(&mut self, host: Option<String>) {
        self.criteria.host = host.filter(|h| !h.is_empty());
    }

    pub fn applied_filters_count(&self) -> usize {
        self.criteria.applied_count()
    }

    /// Reset every criterion atomically. Cancels any pending debounced
    /// title, so the clear takes effect without delay; the next `url_write`
    /// strips all parameters.
    pub fn clear(&mut self) {
        self.criteria = FilterCriteria::default();
        self.title_input.clear();
        self.debouncer.cancel();
        debug!("filter criteria cleared");
    }

    /// Current criteria serialized for the URL.
    pub fn query_string(&self) -> String {
        self.criteria.to_query(&self.tags)
    }

    /// The single URL write path: returns the query string to navigate to,
    /// or None when it matches the last write (no redundant history entries).
    pub fn url_write(&mut self) -> Option<String> {
        let query = self.query_string();
        if self.last_written.as_deref() == Some(query.as_str()) {
            return None;
        }
        debug!(%query, "writing filter state to URL");
        self.last_written = Some(query.clone());
        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<Tag> {
        vec![
            Tag { id: 1, title: "Live Music".to_string() },
            Tag { id: 2, title: "Theatre".to_string() },
        ]
    }

    fn state() -> FilterState {
        FilterState::new(&ListingConfig::default())
    }

    #[test]
    fn test_init_runs_exactly_once() {
        let mut state = state();
        state.init_from_query("title=jazz&tags=live-music", &tags());
        assert_eq!(state.criteria().title_query, "jazz");
        assert_eq!(state.criteria().tag_ids, vec![1]);

        // A second init (e.g. tag metadata re-delivered) must not clobber edits
        state.toggle_tag(2);
        state.init_from_query("title=opera", &tags());
        assert_eq!(state.criteria().title_query, "jazz");
        assert_eq!(state.criteria().tag_ids, vec![1, 2]);
    }

    #[test]
    fn test_title_applies_only_after_debounce() {
        let mut state = state();
        state.init_from_query("", &tags());
        let t0 = Instant::now();

        state.set_title_input("jazz", t0);
        assert_eq!(state.criteria().title_query, "");
        assert_eq!(state.title_input(), "jazz");

        assert!(!state.tick(t0 + Duration::from_millis(100)));
        assert!(state.tick(t0 + Duration::from_millis(300)));
        assert_eq!(state.criteria().title_query, "jazz");
    }

    #[test]
    fn test_clearing_title_applies_immediately() {
        let mut state = state();
        state.init_from_query("title=jazz", &tags());

        state.set_title_input("", Instant::now());
        assert_eq!(state.criteria().title_query, "");
    }

    #[test]
    fn test_url_write_is_idempotent() {
        let mut state = state();
        state.init_from_query("title=jazz", &tags());

        // Initialization seeds the last-written query
        assert_eq!(state.url_write(), None);

        state.set_free_only(true);
        assert_eq!(state.url_write(), Some("title=jazz&free=1".to_string()));
        assert_eq!(state.url_write(), None, "Unchanged state must not rewrite the URL");
    }

    #[test]
    fn test_clear_resets_everything_and_strips_url() {
        let mut state = state();
        state.init_from_query("title=jazz&from=2024-06-01&tags=live-music&free=1", &tags());
        assert_eq!(state.applied_filters_count(), 4);

        let t0 = Instant::now();
        state.set_title_input("jazz festival", t0);
        state.clear();

        assert_eq!(state.applied_filters_count(), 0);
        assert!(state.criteria().is_empty());
        assert_eq!(state.url_write(), Some(String::new()));
        // Pending debounce was cancelled along with the clear
        assert!(!state.tick(t0 + Duration::from_secs(1)));
        assert_eq!(state.criteria().title_query, "");
    }

    #[test]
    fn test_toggle_tag_adds_and_removes() {
        let mut state = state();
        state.init_from_query("", &tags());

        state.toggle_tag(1);
        state.toggle_tag(2);
        assert_eq!(state.criteria().tag_ids, vec![1, 2]);
        assert_eq!(state.query_string(), "tags=live-music%2Ctheatre");

        state.toggle_tag(1);
        assert_eq!(state.criteria().tag_ids, vec![2]);
    }

    #[test]
    fn test_applied_count_tracks_set_fields() {
        let mut state = state();
        state.init_from_query("", &tags());
        assert_eq!(state.applied_filters_count(), 0);

        state.set_from_date(NaiveDate::from_ymd_opt(2024, 6, 1));
        state.set_free_only(true);
        state.set_place(Some("Springfield".to_string()));
        state.toggle_tag(1);
        assert_eq!(state.applied_filters_count(), 4);

        state.set_place(Some(String::new()));
        assert_eq!(state.applied_filters_count(), 3, "Empty place should unset the criterion");
    }
}
