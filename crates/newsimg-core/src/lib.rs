//! Domain types and pure logic for news image selection.
//!
//! Everything in this crate is free of network and database access: story
//! keys, keyword extraction, candidate scoring, attribution rendering, and
//! the configuration layer shared by the other crates.

pub mod app_config;
pub mod attribution;
pub mod config;
pub mod feeds;
pub mod keywords;
pub mod policy;
pub mod scoring;
pub mod story_key;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use attribution::{attribution, render_fragment, ImageAttribution};
pub use config::{load_app_config, load_app_config_from_env};
pub use feeds::{load_feeds, FeedSource, FeedsFile};
pub use keywords::{extract_keywords, DEFAULT_KEYWORD_LIMIT};
pub use policy::{load_scoring_policy, ScoringPolicy};
pub use scoring::{normalize_license, score_candidate, select_best};
pub use story_key::{story_slug, StoryKey};
pub use types::{ImageCandidate, ImageRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
