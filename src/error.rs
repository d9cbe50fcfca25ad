//! Error types for the eventlist engine.

use thiserror::Error;

/// Errors that can occur in eventlist operations.
#[derive(Error, Debug)]
pub enum EventListError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for eventlist operations.
pub type EventListResult<T> = Result<T, EventListError>;
