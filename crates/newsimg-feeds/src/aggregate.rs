//! Combining feeds into one published document.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use newsimg_core::FeedSource;
use sha2::{Digest, Sha256};

use crate::error::FeedError;
use crate::fetch::FeedClient;
use crate::parse::{parse_feed, ParseOptions};
use crate::types::{NewsFeed, NewsItem};

/// Hex SHA-256 of a URL, used as the dedup key.
#[must_use]
pub fn url_key(url: &str) -> String {
    Sha256::digest(url.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Drops items without a title or URL, keeps the newest item per URL, and
/// sorts newest first.
///
/// Items with equal dates keep the order in which they were first seen.
#[must_use]
pub fn dedup_and_sort(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<NewsItem> = Vec::new();

    for item in items {
        if item.title.is_empty() || item.url.is_empty() {
            continue;
        }
        let key = url_key(&item.url);
        match slots.get(&key) {
            Some(&i) => {
                if item.date > kept[i].date {
                    kept[i] = item;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(item);
            }
        }
    }

    kept.sort_by(|a, b| b.date.cmp(&a.date));
    kept
}

/// Fetches and parses every feed, skipping feeds that fail, and returns the
/// deduplicated, sorted document.
pub async fn aggregate_feeds(
    client: &FeedClient,
    feeds: &[FeedSource],
    options: ParseOptions,
) -> NewsFeed {
    let mut items = Vec::new();

    for feed in feeds {
        let parsed = match client.fetch(feed).await {
            Ok(bytes) => parse_feed(&bytes, &feed.name, options, Utc::now()),
            Err(e) => Err(e),
        };
        match parsed {
            Ok(feed_items) => {
                tracing::debug!(feed = %feed.name, items = feed_items.len(), "parsed feed");
                items.extend(feed_items);
            }
            Err(e) => {
                tracing::warn!(feed = %feed.name, url = %feed.url, error = %e, "skipping feed");
            }
        }
    }

    let items = dedup_and_sort(items);
    tracing::info!(feeds = feeds.len(), items = items.len(), "aggregated news feed");

    NewsFeed {
        last_updated: Utc::now(),
        items,
    }
}

/// Writes the document as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`FeedError::Json`] if serialization fails or [`FeedError::Io`]
/// if the file or its directories cannot be written.
pub async fn write_news_feed(path: &Path, feed: &NewsFeed) -> Result<(), FeedError> {
    let json = serde_json::to_string_pretty(feed)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| FeedError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })
}
