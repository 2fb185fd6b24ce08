use crate::FieldAccessible;
use std::fmt;
use std::sync::Arc;

/// Decides whether a record should currently be in the index.
pub enum IndexabilityRule<R> {
    /// Indexable while the named field is truthy (present, not null,
    /// not `false`).
    Field(String),
    /// Indexable while the predicate returns true.
    Predicate(Arc<dyn Fn(&R) -> bool + Send + Sync>),
}

impl<R: FieldAccessible> IndexabilityRule<R> {
    pub fn field(name: impl Into<String>) -> Self {
        IndexabilityRule::Field(name.into())
    }

    pub fn predicate(f: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        IndexabilityRule::Predicate(Arc::new(f))
    }

    /// Evaluates the rule against a record.
    pub fn allows(&self, record: &R) -> bool {
        match self {
            IndexabilityRule::Field(name) => record.field(name).is_some_and(|v| v.is_truthy()),
            IndexabilityRule::Predicate(f) => f(record),
        }
    }
}

impl<R> Clone for IndexabilityRule<R> {
    fn clone(&self) -> Self {
        match self {
            IndexabilityRule::Field(name) => IndexabilityRule::Field(name.clone()),
            IndexabilityRule::Predicate(f) => IndexabilityRule::Predicate(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for IndexabilityRule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexabilityRule::Field(name) => f.debug_tuple("Field").field(name).finish(),
            IndexabilityRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
