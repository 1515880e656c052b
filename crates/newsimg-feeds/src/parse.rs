//! RSS/Atom parsing into [`NewsItem`]s.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Link};

use crate::error::FeedError;
use crate::html::{strip_html, truncate_chars};
use crate::types::NewsItem;

/// Limits applied while parsing a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Only the first this many entries of each feed are read.
    pub max_items: usize,
    pub max_summary_chars: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_items: 15,
            max_summary_chars: 260,
        }
    }
}

/// Parses an RSS or Atom document.
///
/// Entries without a date are stamped with `now`. Entries with an empty title
/// or link are kept here with empty fields and dropped during aggregation.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the bytes are not a recognizable feed.
pub fn parse_feed(
    bytes: &[u8],
    source_name: &str,
    options: ParseOptions,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, FeedError> {
    let feed = feed_rs::parser::parse(bytes).map_err(|source| FeedError::Parse {
        source_name: source_name.to_string(),
        source,
    })?;

    Ok(feed
        .entries
        .iter()
        .take(options.max_items)
        .map(|entry| to_item(entry, source_name, options, now))
        .collect())
}

fn to_item(entry: &Entry, source_name: &str, options: ParseOptions, now: DateTime<Utc>) -> NewsItem {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .unwrap_or_default();

    let raw_summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();

    NewsItem {
        title,
        url: entry_link(&entry.links).unwrap_or_default(),
        source: source_name.to_string(),
        date: entry.published.or(entry.updated).unwrap_or(now),
        summary: truncate_chars(&strip_html(&raw_summary), options.max_summary_chars),
        image: None,
    }
}

/// The `alternate` link if there is one, else the first link.
fn entry_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
