//! Search request construction.
//!
//! A search is a single GET against the search endpoint. The query string
//! is built from the term and a [`SearchOptions`]:
//!
//! | option          | parameter                          |
//! |-----------------|------------------------------------|
//! | term            | `q` (or `bq` for boolean queries)  |
//! | `page_size`     | `size` (always sent, default 10)   |
//! | `boolean_query` | extra `bq` layered on a term query |
//! | `return_fields` | `return-fields=a,b`                |
//! | `page`          | `start=(page - 1) * page_size`     |
//! | `rank`          | `rank=field` or `rank=-field`      |

use reqwest::Url;
use searchsync_types::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How the term is interpreted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Plain text query (`q`).
    #[default]
    Term,
    /// Structured boolean query (`bq`).
    Boolean,
}

impl QueryType {
    fn param(self) -> &'static str {
        match self {
            QueryType::Term => "q",
            QueryType::Boolean => "bq",
        }
    }
}

/// Sort direction of a rank expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    #[default]
    Asc,
    Desc,
}

impl RankDirection {
    /// Only `desc` means descending; every other value falls back to
    /// ascending.
    pub fn parse(s: &str) -> Self {
        if s == "desc" {
            RankDirection::Desc
        } else {
            RankDirection::Asc
        }
    }
}

/// Result ordering: a field name and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub field: String,
    #[serde(default)]
    pub direction: RankDirection,
}

impl Rank {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: RankDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: RankDirection::Desc,
        }
    }

    /// The `rank` parameter value: `-field` when descending, else `field`.
    pub fn to_param(&self) -> String {
        match self.direction {
            RankDirection::Desc => format!("-{}", self.field),
            RankDirection::Asc => self.field.clone(),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl From<&str> for Rank {
    fn from(field: &str) -> Self {
        Rank::asc(field)
    }
}

impl From<String> for Rank {
    fn from(field: String) -> Self {
        Rank::asc(field)
    }
}

impl From<(&str, &str)> for Rank {
    fn from((field, direction): (&str, &str)) -> Self {
        Self {
            field: field.to_string(),
            direction: RankDirection::parse(direction),
        }
    }
}

impl From<(&str, RankDirection)> for Rank {
    fn from((field, direction): (&str, RankDirection)) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }
}

/// Options for a single search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub query_type: QueryType,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub return_fields: Vec<String>,
    /// Extra boolean filter layered on a term query.
    #[serde(default)]
    pub boolean_query: Option<String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query_type: QueryType::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page: None,
            rank: None,
            return_fields: Vec::new(),
            boolean_query: None,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn rank(mut self, rank: impl Into<Rank>) -> Self {
        self.rank = Some(rank.into());
        self
    }

    #[must_use]
    pub fn return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn boolean_query(mut self, bq: impl Into<String>) -> Self {
        self.boolean_query = Some(bq.into());
        self
    }

    /// Offset of the first hit, when a page is requested. Page 0 counts as 1.
    pub fn start(&self) -> Option<usize> {
        self.page
            .map(|page| page.saturating_sub(1).saturating_mul(self.page_size))
    }
}

/// Builds search URLs against a fixed search endpoint.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: Url,
}

impl QueryBuilder {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for `term` and `options`.
    pub fn build(&self, term: &FieldValue, options: &SearchOptions) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&Self::query_string(term, options)));
        url
    }

    /// The encoded query string, without the leading `?`.
    pub fn query_string(term: &FieldValue, options: &SearchOptions) -> String {
        let mut params = vec![
            format!("{}={}", options.query_type.param(), encode(&term.to_string())),
            format!("size={}", options.page_size),
        ];

        if let Some(bq) = &options.boolean_query {
            if options.query_type != QueryType::Boolean {
                params.push(format!("bq={}", encode(bq)));
            }
        }

        if !options.return_fields.is_empty() {
            let fields: Vec<String> = options.return_fields.iter().map(|f| encode(f)).collect();
            params.push(format!("return-fields={}", fields.join(",")));
        }

        if let Some(start) = options.start() {
            params.push(format!("start={start}"));
        }

        if let Some(rank) = &options.rank {
            params.push(format!("rank={}", encode(&rank.to_param())));
        }

        params.join("&")
    }
}

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
