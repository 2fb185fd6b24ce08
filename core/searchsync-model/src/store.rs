//! Record store contract.
//!
//! The store owns persistence; the sync layer only pages through it for
//! bulk operations and resolves search hits back into records.

use crate::{Indexable, StoreResult};
use async_trait::async_trait;
use std::sync::RwLock;

/// Access the sync layer needs from the application's record store.
#[async_trait]
pub trait RecordStore<R: Indexable>: Send + Sync {
    /// Returns up to `limit` records starting at `offset`, in a stable
    /// order. An empty window means the store is exhausted.
    async fn load_window(&self, offset: usize, limit: usize) -> StoreResult<Vec<R>>;

    /// Returns the records with the given ids. Missing ids are skipped.
    async fn fetch_by_ids(&self, ids: &[u64]) -> StoreResult<Vec<R>>;
}

/// In-memory record store, ordered by insertion.
#[derive(Debug)]
pub struct MemoryRecordStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for MemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Indexable + Clone> MemoryRecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any record with the same id.
    pub fn insert(&self, record: R) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records.iter_mut().find(|r| r.record_id() == record.record_id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub fn remove(&self, record_id: u64) -> Option<R> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let pos = records.iter().position(|r| r.record_id() == record_id)?;
        Some(records.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Indexable + Clone> FromIterator<R> for MemoryRecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl<R: Indexable + Clone> RecordStore<R> for MemoryRecordStore<R> {
    async fn load_window(&self, offset: usize, limit: usize) -> StoreResult<Vec<R>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn fetch_by_ids(&self, ids: &[u64]) -> StoreResult<Vec<R>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.record_id()))
            .cloned()
            .collect())
    }
}
