//! Clients for a hosted full-text search index.
//!
//! Two endpoints are covered:
//! - the **search** endpoint (`GET /{api}/search`), wrapped by [`SearchClient`]
//!   and paged lazily through [`ResultPages`]
//! - the **document batch** endpoint (`POST /{api}/documents/batch`), wrapped
//!   by [`DocumentBatchClient`]
//!
//! Both go through an [`HttpTransport`], so the network layer can be swapped
//! out. [`ReqwestTransport`] is the default.
//!
//! # Sandbox mode
//!
//! A client built from a config with [`Mode::Sandbox`] never touches the
//! network: searches return an empty [`ResultSet`] and document operations
//! succeed without side effects. The mode is per client.
//!
//! # Example
//!
//! ```
//! use searchsync_cloud::{CloudSearchConfig, Mode, SearchClient, SearchOptions};
//!
//! let config = CloudSearchConfig::new("my-domain").with_mode(Mode::Sandbox);
//! let client = SearchClient::new(config).unwrap();
//! let url = client.build_url("fritters", &SearchOptions::default().page(3));
//! assert!(url.as_str().contains("start=20"));
//! ```

mod config;
mod documents;
mod error;
mod query;
mod results;
mod search;
mod transport;

pub use config::{
    CloudSearchConfig, Mode, DEFAULT_API_VERSION, DEFAULT_REGION, SERVICE_HOST,
};
pub use documents::DocumentBatchClient;
pub use error::{CloudError, CloudResult};
pub use query::{QueryBuilder, QueryType, Rank, RankDirection, SearchOptions, DEFAULT_PAGE_SIZE};
pub use results::{ResultSet, SearchHit};
pub use search::{ResultPages, SearchClient};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
