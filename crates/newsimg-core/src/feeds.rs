use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One RSS or Atom feed to aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Display name written into each item's `source` field, e.g. `"EFF"`.
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedsFile {
    pub feeds: Vec<FeedSource>,
}

impl Default for FeedsFile {
    /// The feed set the aggregator ships with: civil liberties, Tor,
    /// investigative tech policy, VPN, and browser security news.
    fn default() -> Self {
        let feed = |name: &str, url: &str| FeedSource {
            name: name.to_string(),
            url: url.to_string(),
        };
        Self {
            feeds: vec![
                feed("EFF", "https://www.eff.org/rss/updates.xml"),
                feed("Tor Project", "https://blog.torproject.org/rss.xml"),
                feed(
                    "ProPublica Nerd/News",
                    "https://www.propublica.org/feeds/nerds",
                ),
                feed("Mullvad", "https://mullvad.net/en/blog/rss/"),
                feed(
                    "Mozilla Security Blog",
                    "https://blog.mozilla.org/security/feed/",
                ),
            ],
        }
    }
}

/// Load and validate the feed list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feeds(path: &Path) -> Result<FeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let feeds_file: FeedsFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_feeds(&feeds_file)?;

    Ok(feeds_file)
}

fn validate_feeds(feeds_file: &FeedsFile) -> Result<(), ConfigError> {
    if feeds_file.feeds.is_empty() {
        return Err(ConfigError::Validation(
            "feed list must contain at least one feed".to_string(),
        ));
    }

    let mut seen_urls = HashSet::new();

    for feed in &feeds_file.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }

        let url = feed.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has invalid url '{}'; must start with http:// or https://",
                feed.name, feed.url
            )));
        }

        if !seen_urls.insert(url.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed url: '{}' (from feed '{}')",
                feed.url, feed.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "feeds_test.rs"]
mod tests;
