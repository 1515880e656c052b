//! News feed aggregation: fetch RSS/Atom feeds, normalize their entries,
//! dedup by URL, and publish a single JSON document.

pub mod aggregate;
pub mod error;
pub mod fetch;
pub mod html;
pub mod parse;
pub mod types;

pub use aggregate::{aggregate_feeds, dedup_and_sort, url_key, write_news_feed};
pub use error::FeedError;
pub use fetch::FeedClient;
pub use html::{strip_html, truncate_chars};
pub use parse::{parse_feed, ParseOptions};
pub use types::{NewsFeed, NewsItem};
