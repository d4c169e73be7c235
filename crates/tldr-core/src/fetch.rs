//! Remote page retrieval
//!
//! One fetch is one blocking GET against the page repository. The resolver
//! owns all retry and fallback policy; this module only distinguishes "the
//! page does not exist" (404) from "the network is broken" (everything
//! else).

use std::time::Duration;

use thiserror::Error;

use crate::language::DEFAULT_LANGUAGE;
use crate::page::{Page, PageKey};

/// Connection-level timeout for a single page fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum FetchError {
    /// The repository confirmed the page does not exist (HTTP 404).
    /// Expected during a scan; not an error condition.
    #[error("page not found upstream")]
    NotFound,

    /// Connection, DNS, TLS, timeout, or a non-404 error status.
    #[error("network failure: {0}")]
    Transport(String),
}

/// Anything that can produce a page for a key. The resolver only talks to
/// this trait, so tests swap the network out for a canned map.
pub trait PageSource {
    fn fetch(&self, key: &PageKey) -> Result<Page, FetchError>;
}

/// The real page source: HTTP GET against a raw-file base URL.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Remote page location: `<base>[.<language>]/<platform>/<command>.md`.
    /// The language segment is omitted for English and always precedes the
    /// platform segment.
    pub fn page_url(&self, key: &PageKey) -> String {
        let language_suffix = if key.language == DEFAULT_LANGUAGE {
            String::new()
        } else {
            format!(".{}", key.language)
        };
        format!(
            "{}{}/{}/{}.md",
            self.base_url,
            language_suffix,
            key.platform.as_str(),
            urlencoding::encode(&key.command),
        )
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, key: &PageKey) -> Result<Page, FetchError> {
        let url = self.page_url(key);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Transport(format!("{} for {}", status, url)));
        }

        // The body is read fully before the page is handed back, so an
        // interrupted transfer surfaces here and never reaches the cache.
        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Page::from_bytes(&bytes))
    }
}
