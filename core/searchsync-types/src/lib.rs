//! Core type definitions for searchsync.
//!
//! This crate defines the plain data that flows between the record store
//! and the remote search index:
//! - Index document identifiers (`{type_tag}_{id}`)
//! - Scalar field values and per-document field payloads
//! - Batch document operations (add / delete)
//!
//! Nothing in here performs I/O. Clients and sync policies live in
//! `searchsync-cloud` and `searchsync-index`.

mod field;
mod ids;
mod operation;

pub use field::{FieldPayload, FieldValue};
pub use ids::IndexDocumentId;
pub use operation::SyncOperation;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid document id: {0:?}")]
    InvalidDocumentId(String),
}
