//! Batch document operations.
//!
//! The index uses the same `add` opcode for creating and updating a
//! document; an `add` for an existing id replaces it.

use crate::{FieldPayload, IndexDocumentId, Result};
use serde::{Deserialize, Serialize};

/// One entry of a document batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyncOperation {
    /// Create or replace a document.
    Add {
        id: IndexDocumentId,
        fields: FieldPayload,
    },
    /// Remove a document. Removing an absent document is not an error.
    Delete { id: IndexDocumentId },
}

impl SyncOperation {
    pub fn add(id: impl Into<IndexDocumentId>, fields: FieldPayload) -> Self {
        SyncOperation::Add {
            id: id.into(),
            fields,
        }
    }

    pub fn delete(id: impl Into<IndexDocumentId>) -> Self {
        SyncOperation::Delete { id: id.into() }
    }

    /// Returns the target document id.
    #[must_use]
    pub fn id(&self) -> &IndexDocumentId {
        match self {
            SyncOperation::Add { id, .. } | SyncOperation::Delete { id } => id,
        }
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, SyncOperation::Delete { .. })
    }

    /// Encodes a batch as the JSON array the batch endpoint expects.
    pub fn encode_batch(ops: &[SyncOperation]) -> Result<String> {
        Ok(serde_json::to_string(ops)?)
    }

    /// Decodes a JSON array of operations.
    pub fn decode_batch(json: &str) -> Result<Vec<SyncOperation>> {
        Ok(serde_json::from_str(json)?)
    }
}
