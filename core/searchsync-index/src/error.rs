//! Error types for index synchronization.

use searchsync_cloud::CloudError;
use searchsync_model::StoreError;
use thiserror::Error;

/// Result type for index sync operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors surfaced by an [`IndexSyncPolicy`](crate::IndexSyncPolicy).
#[derive(Debug, Error)]
pub enum IndexError {
    /// Search or document batch failure from the index.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// The record store failed while paging or resolving records.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IndexError {
    /// The underlying index error, if any.
    pub fn as_cloud(&self) -> Option<&CloudError> {
        match self {
            IndexError::Cloud(e) => Some(e),
            IndexError::Store(_) => None,
        }
    }
}
