//! Search result sets.

use crate::error::{CloudError, CloudResult};
use searchsync_types::IndexDocumentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One hit as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: IndexDocumentId,
    /// Values of the requested `return-fields`, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    hits: HitsBody,
}

#[derive(Debug, Deserialize)]
struct HitsBody {
    found: u64,
    #[serde(default)]
    hit: Vec<SearchHit>,
}

/// One page of search results, in server rank order.
///
/// The count metadata (total hits, page size, offset) survives
/// [`replace`](Self::replace), so a page of hits can be swapped for the
/// records they resolve to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<T = SearchHit> {
    items: Vec<T>,
    total_entries: u64,
    page_size: usize,
    offset: u64,
}

impl<T> ResultSet<T> {
    pub fn new(items: Vec<T>, total_entries: u64, page_size: usize, offset: u64) -> Self {
        Self {
            items,
            total_entries,
            page_size,
            offset,
        }
    }

    /// A valid result set with no hits.
    pub fn empty(page_size: usize, offset: u64) -> Self {
        Self::new(Vec::new(), 0, page_size, offset)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total hits across all pages.
    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    /// Requested page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Offset of the first item of this page.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn effective_page_size(&self) -> u64 {
        self.page_size.max(1) as u64
    }

    /// 1-based page number.
    pub fn current_page(&self) -> usize {
        (self.offset / self.effective_page_size()) as usize + 1
    }

    pub fn total_pages(&self) -> usize {
        self.total_entries.div_ceil(self.effective_page_size()) as usize
    }

    pub fn next_page(&self) -> Option<usize> {
        let next = self.current_page() + 1;
        (next <= self.total_pages()).then_some(next)
    }

    pub fn previous_page(&self) -> Option<usize> {
        let current = self.current_page();
        (current > 1).then(|| current - 1)
    }

    /// True when no page follows this one. Depends only on the offset,
    /// page size and total, so it still holds after [`replace`](Self::replace).
    pub fn is_last_page(&self) -> bool {
        self.next_page().is_none()
    }

    /// Replaces the contents, keeping the count metadata.
    pub fn replace<U>(self, items: Vec<U>) -> ResultSet<U> {
        ResultSet {
            items,
            total_entries: self.total_entries,
            page_size: self.page_size,
            offset: self.offset,
        }
    }
}

impl ResultSet<SearchHit> {
    /// Parses a search response body. `page_size` and `offset` echo the
    /// request so pagination continues with the same window.
    pub(crate) fn parse(body: &str, page_size: usize, offset: u64) -> CloudResult<Self> {
        let parsed: SearchResponseBody = serde_json::from_str(body)
            .map_err(|e| CloudError::search_cause("malformed search response", e))?;
        Ok(Self::new(parsed.hits.hit, parsed.hits.found, page_size, offset))
    }

    /// Document ids in rank order.
    pub fn ids(&self) -> impl Iterator<Item = &IndexDocumentId> {
        self.items.iter().map(|hit| &hit.id)
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
