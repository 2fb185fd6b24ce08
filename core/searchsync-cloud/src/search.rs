//! Search client and lazy pagination.

use crate::config::CloudSearchConfig;
use crate::error::{CloudError, CloudResult};
use crate::query::{DEFAULT_PAGE_SIZE, QueryBuilder, SearchOptions};
use crate::results::ResultSet;
use crate::transport::{HttpTransport, ReqwestTransport};
use reqwest::Url;
use searchsync_types::{FieldValue, IndexDocumentId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Answers search calls against the search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    config: Arc<CloudSearchConfig>,
    transport: Arc<dyn HttpTransport>,
    builder: QueryBuilder,
}

impl SearchClient {
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
        let builder = QueryBuilder::new(config.search_url()?);
        Ok(Self {
            config: Arc::new(config),
            transport,
            builder,
        })
    }

    pub fn config(&self) -> &CloudSearchConfig {
        &self.config
    }

    /// The URL a search for `term` would request.
    pub fn build_url(&self, term: impl Into<FieldValue>, options: &SearchOptions) -> Url {
        self.builder.build(&term.into(), options)
    }

    /// Runs one search and returns the requested page.
    pub async fn search(
        &self,
        term: impl Into<FieldValue>,
        options: &SearchOptions,
    ) -> CloudResult<ResultSet> {
        let offset = options.start().unwrap_or(0) as u64;

        if self.config.mode.is_sandbox() {
            debug!("sandbox mode: returning empty result set");
            return Ok(ResultSet::empty(options.page_size, offset));
        }

        let url = self.builder.build(&term.into(), options);
        debug!(%url, "searching");

        let response = self.transport.get(&url).await.map_err(|e| {
            warn!(%url, error = %e, "search request failed");
            CloudError::search_cause("search request failed", e)
        })?;

        if !response.is_ok() {
            warn!(%url, status = response.status, "search returned an error status");
            return Err(CloudError::search_status(response.status, &response.body));
        }

        let results = ResultSet::parse(&response.body, options.page_size, offset)?;
        debug!(
            found = results.total_entries(),
            returned = results.len(),
            "search complete"
        );
        Ok(results)
    }

    /// Lazily pages through every hit for `term`, starting at
    /// `options.page` (or page 1).
    pub fn pages(&self, term: impl Into<FieldValue>, options: SearchOptions) -> ResultPages<'_> {
        ResultPages::new(self, term.into(), options)
    }
}

/// A restartable sequence of result pages, fetched on demand.
///
/// Each call to [`next_page`](Self::next_page) issues one search with the
/// page number advanced. The sequence ends once the hits seen reach the
/// total, or a page comes back short or empty. A page size of 0 pages by
/// [`DEFAULT_PAGE_SIZE`].
pub struct ResultPages<'a> {
    client: &'a SearchClient,
    term: FieldValue,
    options: SearchOptions,
    first_page: usize,
    next_page: usize,
    exhausted: bool,
}

impl<'a> ResultPages<'a> {
    fn new(client: &'a SearchClient, term: FieldValue, mut options: SearchOptions) -> Self {
        if options.page_size == 0 {
            options.page_size = DEFAULT_PAGE_SIZE;
        }
        let first_page = options.page.unwrap_or(1).max(1);
        Self {
            client,
            term,
            options,
            first_page,
            next_page: first_page,
            exhausted: false,
        }
    }

    /// Fetches the next page, or `None` when the sequence is exhausted.
    pub async fn next_page(&mut self) -> CloudResult<Option<ResultSet>> {
        if self.exhausted {
            return Ok(None);
        }

        let options = self.options.clone().page(self.next_page);
        let page = self.client.search(self.term.clone(), &options).await?;
        self.next_page += 1;

        if page.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }
        if page.is_last_page() || page.len() < self.options.page_size {
            self.exhausted = true;
        }
        Ok(Some(page))
    }

    /// Rewinds to the first page.
    pub fn restart(&mut self) {
        self.next_page = self.first_page;
        self.exhausted = false;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Drains the remaining pages into one id list, in rank order.
    pub async fn collect_ids(&mut self) -> CloudResult<Vec<IndexDocumentId>> {
        let mut ids = Vec::new();
        while let Some(page) = self.next_page().await? {
            ids.extend(page.into_iter().map(|hit| hit.id));
        }
        Ok(ids)
    }
}
