use searchsync_types::{FieldValue, IndexDocumentId};

/// Read access to a record's named fields.
pub trait FieldAccessible {
    /// Returns the current value of `name`, or `None` when the record has
    /// no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// A record type that can be mirrored into the search index.
///
/// Several record types may share one index; the type tag keeps their
/// document ids apart.
pub trait Indexable: FieldAccessible + Send + Sync + 'static {
    /// Tag prefixed to every document id of this type (e.g. `"post"`).
    const TYPE_TAG: &'static str;

    /// The record's stable numeric id.
    fn record_id(&self) -> u64;

    /// The index document id for this record.
    fn document_id(&self) -> IndexDocumentId {
        IndexDocumentId::new(Self::TYPE_TAG, self.record_id())
    }
}
