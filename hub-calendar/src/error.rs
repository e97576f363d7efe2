//! Error types for the calendar core.

use thiserror::Error;

/// Errors that can occur while loading or querying calendar data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Event '{id}' references unknown category '{key}'")]
    UnknownCategory { id: String, key: String },

    #[error("Event '{id}' has unknown scope '{key}'")]
    UnknownScope { id: String, key: String },

    #[error("Duplicate event id '{0}'")]
    DuplicateId(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for calendar operations.
pub type Result<T> = std::result::Result<T, Error>;
