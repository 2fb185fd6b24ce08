//! Error types for record store access.

use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a record store can report to the sync layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed.
    #[error("record store error: {0}")]
    Backend(String),
}
