use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One image returned by the search provider, before ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub title: String,
    pub creator: Option<String>,
    pub creator_url: Option<String>,
    /// License code exactly as the provider reported it, e.g. `"by-sa"` or `"pdm"`.
    pub license: String,
    pub license_url: Option<String>,
    /// Upstream provider, e.g. `"wikimedia"` or `"flickr"`.
    pub provider: String,
    /// Human-facing page for the image on the provider's site.
    pub landing_url: Option<String>,
    /// Full-size asset URL.
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tags: Vec<String>,
}

impl ImageCandidate {
    /// Returns the URL to download: the full-size asset if present, otherwise
    /// the thumbnail. The flag is `true` when the thumbnail was substituted.
    #[must_use]
    pub fn asset_url(&self) -> Option<(&str, bool)> {
        non_blank(self.url.as_deref())
            .map(|u| (u, false))
            .or_else(|| non_blank(self.thumbnail.as_deref()).map(|u| (u, true)))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// The persisted image choice for one story.
///
/// Created once per story key and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub story_key: String,
    pub title: String,
    pub creator: String,
    /// Normalized license code (see [`crate::normalize_license`]).
    pub license: String,
    pub license_url: Option<String>,
    /// Provider the image came from.
    pub source: String,
    pub source_url: Option<String>,
    /// Path of the downloaded full-size file.
    pub file_path: String,
    /// Path of the bounded display rendition.
    pub display_path: String,
    pub width: u32,
    pub height: u32,
    /// `true` when the provider had no full-size URL and the thumbnail was
    /// downloaded in its place.
    pub used_thumbnail: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: Option<&str>, thumbnail: Option<&str>) -> ImageCandidate {
        ImageCandidate {
            url: url.map(str::to_string),
            thumbnail: thumbnail.map(str::to_string),
            ..ImageCandidate::default()
        }
    }

    #[test]
    fn asset_url_prefers_full_size() {
        let c = candidate(Some("https://img.example/full.jpg"), Some("https://img.example/t.jpg"));
        assert_eq!(c.asset_url(), Some(("https://img.example/full.jpg", false)));
    }

    #[test]
    fn asset_url_falls_back_to_thumbnail() {
        let c = candidate(None, Some("https://img.example/t.jpg"));
        assert_eq!(c.asset_url(), Some(("https://img.example/t.jpg", true)));
    }

    #[test]
    fn asset_url_treats_blank_as_missing() {
        let c = candidate(Some("   "), Some("https://img.example/t.jpg"));
        assert_eq!(c.asset_url(), Some(("https://img.example/t.jpg", true)));
    }

    #[test]
    fn asset_url_none_when_both_missing() {
        assert_eq!(candidate(None, Some("")).asset_url(), None);
    }
}
