//! Openverse API response types.
//!
//! Only the fields the ranking and attribution code needs are modelled; the
//! API returns many more, which serde ignores.

use serde::Deserialize;

/// Body of `GET /v1/images/`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub results: Vec<ImageResult>,
}

/// One image in a search response.
#[derive(Debug, Deserialize)]
pub struct ImageResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub creator_url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Page on the provider's site describing the image.
    #[serde(default)]
    pub foreign_landing_url: Option<String>,
    /// Full-size asset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// `null` in some responses, hence the custom default.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<ImageTag>,
}

#[derive(Debug, Deserialize)]
pub struct ImageTag {
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ImageTag>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ImageTag>>::deserialize(deserializer)?.unwrap_or_default())
}
