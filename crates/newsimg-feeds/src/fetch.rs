use std::time::Duration;

use newsimg_core::FeedSource;
use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::error::FeedError;

const FEED_ACCEPT: &str = "application/rss+xml, application/atom+xml, */*";

/// HTTP client for feed downloads.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Downloads the raw feed document.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] on network failure or
    /// [`FeedError::UnexpectedStatus`] on a non-2xx status.
    pub async fn fetch(&self, feed: &FeedSource) -> Result<Vec<u8>, FeedError> {
        let response = self
            .client
            .get(&feed.url)
            .header(ACCEPT, FEED_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: feed.url.clone(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
