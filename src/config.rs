//! Listing engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EventListError, EventListResult};

fn default_page_size() -> usize {
    10
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_sentinel_threshold() -> u32 {
    200
}

/// Tunables for pagination and input debouncing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Events fetched per incremental page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Quantum applied to title input before it becomes a filter criterion.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Distance (px) from the end-of-list sentinel at which the next page
    /// fetch is triggered.
    #[serde(default = "default_sentinel_threshold")]
    pub sentinel_threshold: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            sentinel_threshold: default_sentinel_threshold(),
        }
    }
}

impl ListingConfig {
    pub fn from_toml_str(content: &str) -> EventListResult<Self> {
        toml::from_str(content).map_err(|e| EventListError::Config(e.to_string()))
    }
}
