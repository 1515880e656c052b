use std::path::PathBuf;

use newsimg_db::DbError;
use newsimg_openverse::OpenverseError;
use thiserror::Error;

/// Failures while resolving an image for a story.
///
/// Use [`SelectorError::is_skippable`] to decide whether a batch should log
/// and move on or stop.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// Both the keyword query and the raw-title query returned nothing.
    #[error("no usable image found for query \"{query}\"")]
    NoUsableImage { query: String },

    /// The best candidate has neither a full-size nor a thumbnail URL.
    #[error("best candidate for {story_key} has no retrievable asset URL")]
    NoRetrievableAsset { story_key: String },

    #[error("image search failed: {0}")]
    Search(#[source] OpenverseError),

    #[error("image download failed: {0}")]
    Download(#[source] OpenverseError),

    #[error("downloaded image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("cache store error: {0}")]
    Store(#[from] DbError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rendition task failed: {0}")]
    RenditionTask(#[from] tokio::task::JoinError),
}

impl SelectorError {
    /// `true` for per-story failures a batch can skip; `false` for store and
    /// filesystem failures that will hit every following story too.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        match self {
            Self::NoUsableImage { .. }
            | Self::NoRetrievableAsset { .. }
            | Self::Search(_)
            | Self::Download(_)
            | Self::Decode(_) => true,
            Self::Store(_) | Self::Io { .. } | Self::RenditionTask(_) => false,
        }
    }
}
