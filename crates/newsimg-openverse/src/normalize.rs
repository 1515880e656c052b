//! Conversion of raw Openverse results into [`ImageCandidate`]s.

use newsimg_core::ImageCandidate;

use crate::types::ImageResult;

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Converts one search result into a candidate.
///
/// The provider falls back to the `source` field, and both are lower-cased so
/// that provider bonuses match regardless of how the API spells them.
#[must_use]
pub fn normalize_result(result: ImageResult) -> ImageCandidate {
    let provider = clean(result.provider)
        .or_else(|| clean(result.source))
        .unwrap_or_default()
        .to_lowercase();

    ImageCandidate {
        title: clean(result.title).unwrap_or_default(),
        creator: clean(result.creator),
        creator_url: clean(result.creator_url),
        license: clean(result.license).unwrap_or_default(),
        license_url: clean(result.license_url),
        provider,
        landing_url: clean(result.foreign_landing_url),
        url: clean(result.url),
        thumbnail: clean(result.thumbnail),
        width: result.width.filter(|w| *w > 0),
        height: result.height.filter(|h| *h > 0),
        tags: result
            .tags
            .into_iter()
            .map(|t| t.name.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> ImageResult {
        serde_json::from_value(value).expect("valid image result")
    }

    #[test]
    fn maps_all_fields() {
        let result = parse(serde_json::json!({
            "id": "abc",
            "title": " Snowflake bridge diagram ",
            "creator": "Jane Doe",
            "creator_url": "https://commons.wikimedia.org/wiki/User:Jane",
            "license": "cc0",
            "license_url": "https://creativecommons.org/publicdomain/zero/1.0/",
            "provider": "Wikimedia",
            "foreign_landing_url": "https://commons.wikimedia.org/wiki/File:Snowflake.png",
            "url": "https://upload.wikimedia.org/Snowflake.png",
            "thumbnail": "https://api.openverse.engineering/v1/images/abc/thumb/",
            "width": 800,
            "height": 600,
            "tags": [{"name": "tor"}, {"name": " "}, {"name": "privacy"}]
        }));

        let c = normalize_result(result);
        assert_eq!(c.title, "Snowflake bridge diagram");
        assert_eq!(c.creator.as_deref(), Some("Jane Doe"));
        assert_eq!(c.provider, "wikimedia");
        assert_eq!(
            c.landing_url.as_deref(),
            Some("https://commons.wikimedia.org/wiki/File:Snowflake.png")
        );
        assert_eq!((c.width, c.height), (Some(800), Some(600)));
        assert_eq!(c.tags, vec!["tor".to_string(), "privacy".to_string()]);
    }

    #[test]
    fn sparse_result_uses_empty_defaults() {
        let c = normalize_result(parse(serde_json::json!({
            "source": "StockSnap",
            "creator": "",
            "width": 0,
            "tags": null
        })));

        assert_eq!(c.title, "");
        assert_eq!(c.provider, "stocksnap");
        assert!(c.creator.is_none());
        assert!(c.width.is_none());
        assert!(c.url.is_none());
        assert!(c.tags.is_empty());
    }
}
