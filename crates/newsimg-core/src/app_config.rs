use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Development runs log with colors and module targets; test and
    /// production runs log plain lines.
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SQLite` URL of the image cache store.
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub feeds_path: PathBuf,
    /// Optional YAML file overriding the built-in scoring policy.
    pub policy_path: Option<PathBuf>,
    /// Root directory for downloaded images and renditions.
    pub image_dir: PathBuf,
    /// Destination of the aggregated news JSON document.
    pub news_output_path: PathBuf,
    /// Longest side of the display rendition, in pixels.
    pub image_max_side: u32,
    pub search_page_size: u32,
    pub keyword_limit: usize,
    pub search_timeout_secs: u64,
    pub download_timeout_secs: u64,
    /// Image downloads larger than this are rejected.
    pub download_max_bytes: u64,
    pub feed_timeout_secs: u64,
    pub user_agent: String,
    pub openverse_base_url: String,
    pub max_items_per_feed: usize,
    pub max_summary_chars: usize,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}
