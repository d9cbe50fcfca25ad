//! Incremental page loading with dedup merge and a filter-driven full fetch.
//!
//! The loader is a state machine first and an async driver second: `begin_*`
//! hands out a request when one may proceed, `complete_*` folds the result
//! back in. The async `load_more`/`load_all_for_filters` methods drive both
//! halves against an `EventSource`. Completions carry a generation tag so
//! results that arrive after a reset (view unmounted, filters replaced the
//! set wholesale) are ignored instead of clobbering fresh state.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::ListingConfig;
use crate::error::EventListResult;
use crate::event::EventRecord;
use crate::filters::FilterCriteria;

/// Query interface of the persistence collaborator.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Ordered limit/offset page fetch.
    async fn fetch_page(&self, offset: usize, limit: usize) -> EventListResult<Vec<EventRecord>>;
    /// Ordered full-table fetch.
    async fn fetch_all(&self) -> EventListResult<Vec<EventRecord>>;
}

/// An authorized page fetch. Produced by `begin_load_more`, consumed by
/// `complete_load_more`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
    generation: u64,
}

/// An authorized full fetch for active filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullFetch {
    generation: u64,
}

#[derive(Debug)]
pub struct EventLoader {
    events: Vec<EventRecord>,
    seen: HashSet<String>,
    page_size: usize,
    sentinel_threshold: u32,
    /// Offset for the next page: counts fetched records, not merged ones,
    /// so server-side duplicates don't shift later pages.
    page_cursor: usize,
    has_more: bool,
    loading: bool,
    all_loaded: bool,
    load_all_requested: bool,
    error: Option<String>,
    generation: u64,
}

impl EventLoader {
    pub fn new(config: &ListingConfig) -> Self {
        EventLoader {
            events: Vec::new(),
            seen: HashSet::new(),
            page_size: config.page_size,
            sentinel_threshold: config.sentinel_threshold,
            page_cursor: 0,
            has_more: true,
            loading: false,
            all_loaded: false,
            load_all_requested: false,
            error: None,
            generation: 0,
        }
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the complete collection has been loaded for filtering.
    pub fn all_loaded(&self) -> bool {
        self.all_loaded
    }

    /// User-visible message from the last failed fetch, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Request the next page, or None when a fetch is already in flight, no
    /// more pages were declared, or the session switched to full-fetch mode.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more || self.all_loaded {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            offset: self.page_cursor,
            limit: self.page_size,
            generation: self.generation,
        })
    }

    /// Fold a page fetch result back in. Stale completions (a reset happened
    /// since `begin_load_more`) are dropped without touching state.
    pub fn complete_load_more(
        &mut self,
        request: PageRequest,
        result: EventListResult<Vec<EventRecord>>,
    ) {
        if request.generation != self.generation {
            debug!("dropping stale page completion");
            return;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                if page.len() < request.limit {
                    self.has_more = false;
                }
                self.page_cursor += page.len();
                let merged = self.merge(page);
                debug!(merged, total = self.events.len(), has_more = self.has_more, "page merged");
            }
            Err(err) => {
                warn!(error = %err, "page fetch failed, pagination disabled");
                self.error = Some(err.to_string());
                self.has_more = false;
            }
        }
    }

    /// Request the full collection once filter criteria become non-empty.
    /// Fires at most once per session; an in-flight page fetch is superseded
    /// (its completion will be stale).
    pub fn begin_load_all(&mut self, criteria: &FilterCriteria) -> Option<FullFetch> {
        if criteria.is_empty() || self.load_all_requested {
            return None;
        }
        self.load_all_requested = true;
        self.generation += 1;
        self.loading = true;
        Some(FullFetch {
            generation: self.generation,
        })
    }

    /// Fold the full-fetch result in: the loaded set is replaced wholesale
    /// and incremental fetching stays disabled for the rest of the session,
    /// so filtered counts are exact against the full dataset.
    pub fn complete_load_all(
        &mut self,
        request: FullFetch,
        result: EventListResult<Vec<EventRecord>>,
    ) {
        if request.generation != self.generation {
            debug!("dropping stale full-fetch completion");
            return;
        }
        self.loading = false;

        match result {
            Ok(all) => {
                self.events.clear();
                self.seen.clear();
                let merged = self.merge(all);
                self.all_loaded = true;
                self.has_more = false;
                debug!(total = merged, "full collection loaded for filters");
            }
            Err(err) => {
                warn!(error = %err, "full fetch failed");
                self.error = Some(err.to_string());
                self.has_more = false;
            }
        }
    }

    /// Scroll-sentinel trigger: the host reports how far (px) the viewport
    /// is from the sentinel near the list's end; once it comes within the
    /// configured threshold the next page is requested. Inert once no more
    /// pages exist.
    pub fn on_sentinel_proximity(&mut self, distance: u32) -> Option<PageRequest> {
        if distance > self.sentinel_threshold {
            return None;
        }
        self.begin_load_more()
    }

    /// Abandon the session's loaded state (view unmounted or rebuilt).
    /// In-flight completions become stale and will be ignored.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.events.clear();
        self.seen.clear();
        self.page_cursor = 0;
        self.has_more = true;
        self.loading = false;
        self.all_loaded = false;
        self.load_all_requested = false;
        self.error = None;
    }

    /// Append events, deduplicating by id (slug when absent); the first-seen
    /// copy wins and first-seen order is preserved. Returns how many were
    /// actually added.
    fn merge(&mut self, page: Vec<EventRecord>) -> usize {
        let mut added = 0;
        for event in page {
            if self.seen.insert(event.dedup_key().to_string()) {
                self.events.push(event);
                added += 1;
            }
        }
        added
    }

    /// Fetch and merge the next page. Returns false if the call was a
    /// guarded no-op (already loading or nothing more to load).
    pub async fn load_more<S: EventSource>(&mut self, source: &S) -> bool {
        let Some(request) = self.begin_load_more() else {
            return false;
        };
        let result = source.fetch_page(request.offset, request.limit).await;
        self.complete_load_more(request, result);
        true
    }

    /// Switch to full-fetch mode for the given (non-empty) criteria. Returns
    /// false if filters are empty or the switch already happened.
    pub async fn load_all_for_filters<S: EventSource>(
        &mut self,
        source: &S,
        criteria: &FilterCriteria,
    ) -> bool {
        let Some(request) = self.begin_load_all(criteria) else {
            return false;
        };
        let result = source.fetch_all().await;
        self.complete_load_all(request, result);
        true
    }
}
