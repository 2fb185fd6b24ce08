//! Document batch client.

use crate::config::CloudSearchConfig;
use crate::error::{CloudError, CloudResult};
use crate::transport::{HttpTransport, ReqwestTransport};
use reqwest::Url;
use searchsync_types::{FieldPayload, IndexDocumentId, SyncOperation};
use std::sync::Arc;
use tracing::{debug, info, warn};

const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// Submits add/delete operations to the document batch endpoint.
///
/// Every call is one request. Failures are reported per call and never
/// retried here.
#[derive(Clone)]
pub struct DocumentBatchClient {
    config: Arc<CloudSearchConfig>,
    transport: Arc<dyn HttpTransport>,
    batch_url: Url,
}

impl DocumentBatchClient {
    /// Creates a client using the default `reqwest` transport.
    pub fn new(config: CloudSearchConfig) -> CloudResult<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(
        config: CloudSearchConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> CloudResult<Self> {
        config.validate()?;
        let batch_url = config.document_batch_url()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
            batch_url,
        })
    }

    pub fn config(&self) -> &CloudSearchConfig {
        &self.config
    }

    pub fn batch_url(&self) -> &Url {
        &self.batch_url
    }

    /// Sends `ops` as one JSON array.
    pub async fn submit(&self, ops: &[SyncOperation]) -> CloudResult<()> {
        if self.config.mode.is_sandbox() {
            debug!(count = ops.len(), "sandbox mode: skipping document batch");
            return Ok(());
        }
        if ops.is_empty() {
            return Ok(());
        }

        let body = SyncOperation::encode_batch(ops)
            .map_err(|e| CloudError::document_cause("failed to encode batch", e))?;

        let response = self
            .transport
            .post(&self.batch_url, body, JSON_HEADERS)
            .await
            .map_err(|e| {
                warn!(url = %self.batch_url, error = %e, "document batch request failed");
                CloudError::document_cause("document batch request failed", e)
            })?;

        if !response.is_ok() {
            warn!(
                url = %self.batch_url,
                status = response.status,
                "document batch returned an error status"
            );
            return Err(CloudError::document_status(response.status, &response.body));
        }

        info!(count = ops.len(), "document batch accepted");
        Ok(())
    }

    /// Adds a document. Blank values are dropped; the service rejects them.
    pub async fn add(
        &self,
        id: impl Into<IndexDocumentId>,
        fields: FieldPayload,
    ) -> CloudResult<()> {
        self.submit(&[SyncOperation::add(id, fields.without_blanks())])
            .await
    }

    /// Replaces a document. Fields are sent as given, nulls included.
    pub async fn update(
        &self,
        id: impl Into<IndexDocumentId>,
        fields: FieldPayload,
    ) -> CloudResult<()> {
        self.submit(&[SyncOperation::add(id, fields)]).await
    }

    /// Removes a document. Removing an absent document succeeds.
    pub async fn delete(&self, id: impl Into<IndexDocumentId>) -> CloudResult<()> {
        self.submit(&[SyncOperation::delete(id)]).await
    }
}
