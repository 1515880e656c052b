//! HTTP client for the Openverse image search API.
//!
//! Wraps `reqwest` with the query parameters the selector relies on, typed
//! response deserialization, and per-request timeouts. Every request is
//! attempted once; a failure is returned to the caller as-is.

use std::time::Duration;

use newsimg_core::ImageCandidate;
use reqwest::header::REFERER;
use reqwest::{Client, Url};

use crate::error::OpenverseError;
use crate::normalize::normalize_result;
use crate::types::SearchResponse;

const DEFAULT_BASE_URL: &str = "https://api.openverse.engineering/";
const SEARCH_PATH: &str = "v1/images/";
const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// License codes requested from the search endpoint.
pub const ALLOWED_LICENSES: [&str; 8] = [
    "cc0", "pdm", "by", "by-sa", "by-nd", "by-nc", "by-nc-sa", "by-nc-nd",
];

/// Client for the Openverse REST API.
///
/// Use [`OpenverseClient::new`] for production or
/// [`OpenverseClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct OpenverseClient {
    client: Client,
    base_url: Url,
    search_timeout: Duration,
    download_timeout: Duration,
    max_download_bytes: u64,
}

impl OpenverseClient {
    /// Creates a client pointed at the public Openverse API.
    ///
    /// # Errors
    ///
    /// Returns [`OpenverseError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        search_timeout_secs: u64,
        download_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, OpenverseError> {
        Self::with_base_url(
            search_timeout_secs,
            download_timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OpenverseError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OpenverseError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        search_timeout_secs: u64,
        download_timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, OpenverseError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so that joining "v1/images/" appends
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OpenverseError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            search_timeout: Duration::from_secs(search_timeout_secs),
            download_timeout: Duration::from_secs(download_timeout_secs),
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        })
    }

    /// Caps the size of a downloaded asset.
    #[must_use]
    pub fn with_max_download_bytes(mut self, max_download_bytes: u64) -> Self {
        self.max_download_bytes = max_download_bytes;
        self
    }

    /// Searches for images matching `query`.
    ///
    /// Results are restricted to commercially usable licenses from
    /// [`ALLOWED_LICENSES`] and exclude mature content. An empty result list
    /// is not an error.
    ///
    /// # Errors
    ///
    /// - [`OpenverseError::Http`] on network failure or timeout.
    /// - [`OpenverseError::UnexpectedStatus`] on a non-2xx status.
    /// - [`OpenverseError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search_images(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<Vec<ImageCandidate>, OpenverseError> {
        let url = self.search_url(query, page_size)?;

        let body = self.request_json(&url).await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| OpenverseError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        tracing::debug!(
            query,
            returned = response.results.len(),
            total = ?response.result_count,
            "openverse search complete"
        );

        Ok(response.results.into_iter().map(normalize_result).collect())
    }

    /// Downloads an image asset and returns its bytes.
    ///
    /// # Errors
    ///
    /// - [`OpenverseError::InvalidUrl`] if `url` does not parse.
    /// - [`OpenverseError::Http`] on network failure or timeout.
    /// - [`OpenverseError::UnexpectedStatus`] on a non-2xx status.
    /// - [`OpenverseError::TooLarge`] if the body exceeds the download limit.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, OpenverseError> {
        let parsed = Url::parse(url).map_err(|e| OpenverseError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let mut response = self
            .client
            .get(parsed)
            .header(REFERER, self.referer())
            .timeout(self.download_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenverseError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let too_large = || OpenverseError::TooLarge {
            url: url.to_owned(),
            limit: self.max_download_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_download_bytes)
        {
            return Err(too_large());
        }

        // Content-Length may be absent or wrong, so count while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let len = u64::try_from(body.len() + chunk.len()).unwrap_or(u64::MAX);
            if len > self.max_download_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Builds the search URL with properly percent-encoded query parameters.
    fn search_url(&self, query: &str, page_size: u32) -> Result<Url, OpenverseError> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| OpenverseError::InvalidUrl {
                url: format!("{}{SEARCH_PATH}", self.base_url),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page_size", &page_size.to_string())
            .append_pair("license_type", "commercial")
            .append_pair("license", &ALLOWED_LICENSES.join(","))
            .append_pair("mature", "false");
        Ok(url)
    }

    /// Origin of the API, sent as `Referer` with downloads.
    fn referer(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Sends a GET request, checks for a 2xx status, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, OpenverseError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.search_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenverseError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| OpenverseError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
