//! Index sync policy: which records reach the index, and with what fields.

use crate::hooks::LifecycleHooks;
use crate::sink::{ErrorSink, Rethrow};
use crate::IndexResult;
use async_trait::async_trait;
use searchsync_cloud::{
    CloudSearchConfig, CloudResult, DocumentBatchClient, ResultSet, SearchClient, SearchOptions,
};
use searchsync_model::{IndexabilityRule, Indexable, RecordStore};
use searchsync_types::{FieldPayload, FieldValue, SyncOperation};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Records per batch when indexing a whole store.
pub const ADD_WINDOW_SIZE: usize = 100;

/// Records per batch when removing a whole store from the index.
pub const REMOVE_WINDOW_SIZE: usize = 1000;

/// Outcome of a bulk add or remove.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Windows read from the store.
    pub windows: usize,
    /// Operations in accepted batches.
    pub submitted: usize,
    /// Records left out by the indexability rule.
    pub skipped: usize,
    /// Batches that failed and were swallowed by the error sink.
    pub failed_batches: usize,
}

/// Keeps the index in step with one record type.
pub struct IndexSyncPolicy<R: Indexable> {
    documents: DocumentBatchClient,
    search: SearchClient,
    fields: Vec<String>,
    rule: Option<IndexabilityRule<R>>,
    sink: Arc<dyn ErrorSink>,
}

impl<R: Indexable> IndexSyncPolicy<R> {
    /// Creates a policy with `reqwest`-backed clients for `config`.
    pub fn new<I, S>(config: CloudSearchConfig, fields: I) -> CloudResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = DocumentBatchClient::new(config.clone())?;
        let search = SearchClient::new(config)?;
        Ok(Self::with_clients(documents, search, fields))
    }

    /// Creates a policy over existing clients.
    pub fn with_clients<I, S>(documents: DocumentBatchClient, search: SearchClient, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents,
            search,
            fields: fields.into_iter().map(Into::into).collect(),
            rule: None,
            sink: Arc::new(Rethrow),
        }
    }

    /// Only index records the rule allows.
    #[must_use]
    pub fn with_rule(mut self, rule: IndexabilityRule<R>) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Routes document update failures to `sink` instead of rethrowing.
    #[must_use]
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn documents(&self) -> &DocumentBatchClient {
        &self.documents
    }

    pub fn search_client(&self) -> &SearchClient {
        &self.search
    }

    /// True when no rule is set or the rule allows the record.
    pub fn is_indexable(&self, record: &R) -> bool {
        self.rule.as_ref().is_none_or(|rule| rule.allows(record))
    }

    /// Payload for a newly created record: missing fields become empty
    /// strings and every blank value is dropped.
    pub fn create_payload(&self, record: &R) -> FieldPayload {
        self.fields
            .iter()
            .map(|name| {
                let value = record
                    .field(name)
                    .unwrap_or_else(|| FieldValue::Text(String::new()));
                (name.clone(), value)
            })
            .collect::<FieldPayload>()
            .without_blanks()
    }

    /// Payload for an updated record: values pass through as-is so a
    /// cleared field reaches the index as null.
    pub fn update_payload(&self, record: &R) -> FieldPayload {
        self.fields
            .iter()
            .map(|name| (name.clone(), record.field(name).unwrap_or(FieldValue::Null)))
            .collect()
    }

    /// Adds a newly created record, if it is indexable.
    pub async fn on_create(&self, record: &R) -> IndexResult<()> {
        if !self.is_indexable(record) {
            debug!(id = %record.document_id(), "not indexable, skipping create");
            return Ok(());
        }
        let op = SyncOperation::add(record.document_id(), self.create_payload(record));
        self.submit(&[op]).await.map(|_| ())
    }

    /// Replaces an updated record, or removes it once it stops being
    /// indexable.
    pub async fn on_update(&self, record: &R) -> IndexResult<()> {
        let op = if self.is_indexable(record) {
            SyncOperation::add(record.document_id(), self.update_payload(record))
        } else {
            debug!(id = %record.document_id(), "no longer indexable, removing");
            SyncOperation::delete(record.document_id())
        };
        self.submit(&[op]).await.map(|_| ())
    }

    /// Removes a destroyed record.
    pub async fn on_destroy(&self, record: &R) -> IndexResult<()> {
        self.submit(&[SyncOperation::delete(record.document_id())])
            .await
            .map(|_| ())
    }

    /// Indexes every indexable record in `store`, one batch per window of
    /// up to [`ADD_WINDOW_SIZE`] records. Stops at the first empty window.
    pub async fn add_all(&self, store: &dyn RecordStore<R>) -> IndexResult<BulkReport> {
        let mut report = BulkReport::default();
        let mut offset = 0;

        loop {
            let window = store.load_window(offset, ADD_WINDOW_SIZE).await?;
            if window.is_empty() {
                break;
            }
            offset += window.len();
            report.windows += 1;

            let ops: Vec<SyncOperation> = window
                .iter()
                .filter(|record| self.is_indexable(record))
                .map(|record| SyncOperation::add(record.document_id(), self.create_payload(record)))
                .collect();
            report.skipped += window.len() - ops.len();

            if !ops.is_empty() {
                if self.submit(&ops).await? {
                    report.submitted += ops.len();
                } else {
                    report.failed_batches += 1;
                }
            }
        }

        info!(tag = R::TYPE_TAG, ?report, "bulk add finished");
        Ok(report)
    }

    /// Removes every record in `store` from the index, one batch per
    /// window of up to [`REMOVE_WINDOW_SIZE`] records, until the store
    /// returns an empty window. The rule is not consulted.
    pub async fn remove_all(&self, store: &dyn RecordStore<R>) -> IndexResult<BulkReport> {
        let mut report = BulkReport::default();
        let mut offset = 0;

        loop {
            let window = store.load_window(offset, REMOVE_WINDOW_SIZE).await?;
            if window.is_empty() {
                break;
            }
            offset += window.len();
            report.windows += 1;

            let ops: Vec<SyncOperation> = window
                .iter()
                .map(|record| SyncOperation::delete(record.document_id()))
                .collect();

            if self.submit(&ops).await? {
                report.submitted += ops.len();
            } else {
                report.failed_batches += 1;
            }
        }

        info!(tag = R::TYPE_TAG, ?report, "bulk remove finished");
        Ok(report)
    }

    /// Searches the index and resolves this type's hits to records, in
    /// rank order. Search failures are returned directly.
    pub async fn find(
        &self,
        term: impl Into<FieldValue>,
        options: &SearchOptions,
        store: &dyn RecordStore<R>,
    ) -> IndexResult<ResultSet<R>> {
        let results = self.search.search(term, options).await?;

        let ids: Vec<u64> = results
            .ids()
            .filter_map(|id| match id.split() {
                Ok((tag, record_id)) if tag == R::TYPE_TAG => Some(record_id),
                _ => None,
            })
            .collect();

        if ids.is_empty() {
            return Ok(results.replace(Vec::new()));
        }

        let rank: HashMap<u64, usize> = ids.iter().enumerate().map(|(pos, id)| (*id, pos)).collect();
        let mut records = store.fetch_by_ids(&ids).await?;
        records.retain(|record| rank.contains_key(&record.record_id()));
        records.sort_by_key(|record| rank.get(&record.record_id()).copied().unwrap_or(usize::MAX));

        debug!(hits = ids.len(), resolved = records.len(), "resolved search hits");
        Ok(results.replace(records))
    }

    /// Submits a batch. Returns `Ok(false)` when the sink swallowed a failure.
    async fn submit(&self, ops: &[SyncOperation]) -> IndexResult<bool> {
        match self.documents.submit(ops).await {
            Ok(()) => Ok(true),
            Err(err) => {
                self.sink.on_error(err)?;
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl<R: Indexable> LifecycleHooks<R> for IndexSyncPolicy<R> {
    async fn on_create(&self, record: &R) -> IndexResult<()> {
        IndexSyncPolicy::on_create(self, record).await
    }

    async fn on_update(&self, record: &R) -> IndexResult<()> {
        IndexSyncPolicy::on_update(self, record).await
    }

    async fn on_destroy(&self, record: &R) -> IndexResult<()> {
        IndexSyncPolicy::on_destroy(self, record).await
    }
}
