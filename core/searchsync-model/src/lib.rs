//! Record model for searchsync.
//!
//! Defines the contract between an application's record store and the
//! index sync layer:
//! - [`FieldAccessible`]: named field lookup on a record
//! - [`Indexable`]: a record type with a type tag and numeric id
//! - [`IndexabilityRule`]: decides whether a record belongs in the index
//! - [`RecordStore`]: windowed iteration and batch fetch by id
//!
//! Concrete record types implement these traits explicitly; the sync layer
//! never reaches into a record any other way.

mod error;
mod record;
mod rule;
mod store;

pub use error::{StoreError, StoreResult};
pub use record::{FieldAccessible, Indexable};
pub use rule::IndexabilityRule;
pub use store::{MemoryRecordStore, RecordStore};
