//! Identifier types for documents stored in the search index.
//!
//! Records of several types share one index, so every document id carries
//! the record's type tag: `{type_tag}_{record_id}`. The record id is always
//! the trailing run of digits, which makes the split unambiguous even when
//! the tag itself contains underscores or digits.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a document in the search index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDocumentId(String);

impl IndexDocumentId {
    /// Builds the id for a record of the given type.
    #[must_use]
    pub fn new(type_tag: &str, record_id: u64) -> Self {
        Self(format!("{type_tag}_{record_id}"))
    }

    /// Wraps an id exactly as given, without a type tag.
    #[must_use]
    pub fn raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses a document id. Any non-empty string is accepted.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::InvalidDocumentId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the id as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the id back into `(type_tag, record_id)`.
    ///
    /// Fails when there is no digit suffix or no tag in front of it.
    pub fn split(&self) -> Result<(&str, u64)> {
        let invalid = || Error::InvalidDocumentId(self.0.clone());

        let digits_at = self
            .0
            .rfind(|c: char| !c.is_ascii_digit())
            .map_or(0, |i| i + 1);
        let (prefix, digits) = self.0.split_at(digits_at);
        if prefix.is_empty() || digits.is_empty() {
            return Err(invalid());
        }

        let record_id = digits.parse::<u64>().map_err(|_| invalid())?;
        let type_tag = prefix.strip_suffix('_').unwrap_or(prefix);
        if type_tag.is_empty() {
            return Err(invalid());
        }
        Ok((type_tag, record_id))
    }

    /// Returns the type tag, if the id carries one.
    #[must_use]
    pub fn type_tag(&self) -> Option<&str> {
        self.split().ok().map(|(tag, _)| tag)
    }

    /// Returns the record id, if the id carries a type tag and numeric suffix.
    #[must_use]
    pub fn record_id(&self) -> Option<u64> {
        self.split().ok().map(|(_, id)| id)
    }
}

impl fmt::Display for IndexDocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IndexDocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&str> for IndexDocumentId {
    fn from(s: &str) -> Self {
        Self::raw(s)
    }
}

impl From<String> for IndexDocumentId {
    fn from(s: String) -> Self {
        Self::raw(s)
    }
}

impl AsRef<str> for IndexDocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
