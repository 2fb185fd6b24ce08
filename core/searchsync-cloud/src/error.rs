//! Search index client error types.

use std::error::Error as StdError;
use thiserror::Error;

/// Result type for search index operations.
pub type CloudResult<T> = Result<T, CloudError>;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur talking to the search index.
#[derive(Debug, Error)]
pub enum CloudError {
    /// Missing or malformed configuration (e.g. no search domain).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A search request failed in transport or returned a non-200 status.
    #[error("search failed: {message}")]
    Search {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A document batch failed in transport or returned a non-200 status.
    #[error("document update failed: {message}")]
    DocumentUpdate {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CloudError {
    pub(crate) fn search_status(status: u16, body: &str) -> Self {
        CloudError::Search {
            status: Some(status),
            message: status_message(status, body),
            source: None,
        }
    }

    pub(crate) fn search_cause(context: &str, err: impl Into<BoxError>) -> Self {
        let err = err.into();
        CloudError::Search {
            status: None,
            message: format!("{context}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn document_status(status: u16, body: &str) -> Self {
        CloudError::DocumentUpdate {
            status: Some(status),
            message: status_message(status, body),
            source: None,
        }
    }

    pub(crate) fn document_cause(context: &str, err: impl Into<BoxError>) -> Self {
        let err = err.into();
        CloudError::DocumentUpdate {
            status: None,
            message: format!("{context}: {err}"),
            source: Some(err),
        }
    }

    /// HTTP status returned by the service, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudError::Search { status, .. } | CloudError::DocumentUpdate { status, .. } => {
                *status
            }
            _ => None,
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, CloudError::Search { .. })
    }

    pub fn is_document_update(&self) -> bool {
        matches!(self, CloudError::DocumentUpdate { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, CloudError::Config(_))
    }
}

fn status_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("{status}")
    } else {
        format!("{status}: {body}")
    }
}
