use chrono::{DateTime, Utc};
use newsimg_core::ImageAttribution;
use serde::{Deserialize, Serialize};

/// One story in the published feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    /// Display name of the feed the item came from.
    pub source: String,
    #[serde(with = "iso_seconds")]
    pub date: DateTime<Utc>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttribution>,
}

/// The published document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsFeed {
    #[serde(with = "iso_seconds")]
    pub last_updated: DateTime<Utc>,
    pub items: Vec<NewsItem>,
}

/// RFC 3339 in UTC with whole seconds, e.g. `2025-09-21T12:34:56Z`.
mod iso_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
