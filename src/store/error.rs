//! Store error types
//!
//! Failures of the relational or time-series executors. These are
//! reported once and never retried.

use thiserror::Error;

/// Errors raised by a data store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite statement failed
    #[error("Relational query failed: {0}")]
    Relational(#[from] rusqlite::Error),

    /// Transport-level failure talking to the time-series store
    #[error("Time-series request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The time-series store rejected the query
    #[error("Time-series query failed ({status}): {message}")]
    TimeSeries { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Connection lock poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
