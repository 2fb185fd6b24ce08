//! Lifecycle hook registration.
//!
//! The record store owns a [`LifecycleNotifier`] per record type and calls
//! it after each committed mutation. Nothing is wired up implicitly.

use crate::IndexResult;
use async_trait::async_trait;
use searchsync_model::Indexable;
use std::sync::Arc;
use tracing::debug;

/// Callbacks invoked by the record store after a mutation commits.
#[async_trait]
pub trait LifecycleHooks<R: Indexable>: Send + Sync {
    async fn on_create(&self, record: &R) -> IndexResult<()>;

    async fn on_update(&self, record: &R) -> IndexResult<()>;

    async fn on_destroy(&self, record: &R) -> IndexResult<()>;
}

/// Kind of committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created,
    Updated,
    Destroyed,
}

/// Dispatches lifecycle events to the registered hooks, in registration
/// order. The first failing hook stops the dispatch.
pub struct LifecycleNotifier<R: Indexable> {
    hooks: Vec<Arc<dyn LifecycleHooks<R>>>,
}

impl<R: Indexable> Default for LifecycleNotifier<R> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<R: Indexable> LifecycleNotifier<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hooks: Arc<dyn LifecycleHooks<R>>) {
        self.hooks.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn notify(&self, event: LifecycleEvent, record: &R) -> IndexResult<()> {
        debug!(?event, record_id = record.record_id(), tag = R::TYPE_TAG, "lifecycle event");
        for hooks in &self.hooks {
            match event {
                LifecycleEvent::Created => hooks.on_create(record).await?,
                LifecycleEvent::Updated => hooks.on_update(record).await?,
                LifecycleEvent::Destroyed => hooks.on_destroy(record).await?,
            }
        }
        Ok(())
    }
}
