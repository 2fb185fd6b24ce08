//! Client configuration.

use crate::error::{CloudError, CloudResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2011-02-01";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Host suffix of the hosted search service.
pub const SERVICE_HOST: &str = "cloudsearch.amazonaws.com";

/// Whether a client talks to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Production,
    /// No network calls: searches come back empty, document updates succeed.
    Sandbox,
}

impl Mode {
    pub fn is_sandbox(self) -> bool {
        self == Mode::Sandbox
    }
}

/// Configuration shared by the search and document clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudSearchConfig {
    /// Search domain name (required).
    pub search_domain: String,
    /// Service region.
    #[serde(default = "default_region")]
    pub region: String,
    /// API version path segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub mode: Mode,
    /// Base URL replacing the computed `search-…` host (e.g. `http://127.0.0.1:8080`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_endpoint: Option<String>,
    /// Base URL replacing the computed `doc-…` host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_endpoint: Option<String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for CloudSearchConfig {
    fn default() -> Self {
        Self {
            search_domain: String::new(),
            region: default_region(),
            api_version: default_api_version(),
            mode: Mode::default(),
            search_endpoint: None,
            document_endpoint: None,
        }
    }
}

impl CloudSearchConfig {
    /// Creates a production config for the given search domain.
    pub fn new(search_domain: impl Into<String>) -> Self {
        Self {
            search_domain: search_domain.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Points both endpoints at one base URL.
    #[must_use]
    pub fn with_endpoint(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.search_endpoint = Some(base_url.clone());
        self.document_endpoint = Some(base_url);
        self
    }

    /// Reads `CLOUDSEARCH_DOMAIN`, `CLOUDSEARCH_REGION`,
    /// `CLOUDSEARCH_API_VERSION`, `CLOUDSEARCH_ENDPOINT` and
    /// `CLOUDSEARCH_MODE` (`production` | `sandbox`).
    pub fn from_env() -> CloudResult<Self> {
        let search_domain = env::var("CLOUDSEARCH_DOMAIN").unwrap_or_default();
        let mut config = Self::new(search_domain);

        if let Ok(region) = env::var("CLOUDSEARCH_REGION") {
            config.region = region;
        }
        if let Ok(api_version) = env::var("CLOUDSEARCH_API_VERSION") {
            config.api_version = api_version;
        }
        if let Ok(endpoint) = env::var("CLOUDSEARCH_ENDPOINT") {
            config = config.with_endpoint(endpoint);
        }
        if let Ok(mode) = env::var("CLOUDSEARCH_MODE") {
            config.mode = match mode.to_ascii_lowercase().as_str() {
                "production" => Mode::Production,
                "sandbox" => Mode::Sandbox,
                other => {
                    return Err(CloudError::Config(format!("unknown mode: {other}")));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Fails fast when the search domain is missing.
    pub fn validate(&self) -> CloudResult<()> {
        if self.search_domain.trim().is_empty() {
            return Err(CloudError::Config(
                "search domain is not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Full URL of the search endpoint.
    pub fn search_url(&self) -> CloudResult<Url> {
        let base = match &self.search_endpoint {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!(
                "http://search-{}.{}.{SERVICE_HOST}",
                self.search_domain, self.region
            ),
        };
        parse_url(&format!("{base}/{}/search", self.api_version))
    }

    /// Full URL of the document batch endpoint.
    pub fn document_batch_url(&self) -> CloudResult<Url> {
        let base = match &self.document_endpoint {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!(
                "http://doc-{}.{}.{SERVICE_HOST}",
                self.search_domain, self.region
            ),
        };
        parse_url(&format!("{base}/{}/documents/batch", self.api_version))
    }
}

fn parse_url(raw: &str) -> CloudResult<Url> {
    Url::parse(raw).map_err(|e| CloudError::Config(format!("invalid endpoint {raw:?}: {e}")))
}
