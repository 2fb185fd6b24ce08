//! Record-to-index synchronization for searchsync.
//!
//! An [`IndexSyncPolicy`] is registered once per record type. The record
//! store calls its lifecycle hooks after each committed mutation and the
//! policy decides what the index should see:
//!
//! | event    | rule holds         | rule fails |
//! |----------|--------------------|------------|
//! | create   | add                | nothing    |
//! | update   | add (replace)      | delete     |
//! | destroy  | delete             | delete     |
//!
//! Bulk operations page through the whole store in fixed windows
//! ([`ADD_WINDOW_SIZE`], [`REMOVE_WINDOW_SIZE`]) and send one batch per
//! window. Failed document updates go to the policy's [`ErrorSink`], which
//! rethrows by default.
//!
//! Search results come back through [`IndexSyncPolicy::find`], which keeps
//! only this record type's hits and resolves them to records in rank order.

mod error;
mod hooks;
mod policy;
mod sink;

pub use error::{IndexError, IndexResult};
pub use hooks::{LifecycleEvent, LifecycleHooks, LifecycleNotifier};
pub use policy::{BulkReport, IndexSyncPolicy, ADD_WINDOW_SIZE, REMOVE_WINDOW_SIZE};
pub use sink::{ErrorSink, LogAndContinue, Rethrow};
