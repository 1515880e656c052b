use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable
/// configuration pointing at `./news_images.sqlite3`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = or_default("NEWS_IMG_DB", "sqlite://news_images.sqlite3");
    let env = parse_environment(&or_default("NEWSIMG_ENV", "development"))?;
    let log_level = or_default("NEWSIMG_LOG_LEVEL", "info");

    let feeds_path = PathBuf::from(or_default("NEWSIMG_FEEDS_PATH", "./config/feeds.yaml"));
    let policy_path = lookup("NEWSIMG_POLICY_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let image_dir = PathBuf::from(or_default("NEWSIMG_IMAGE_DIR", "./news_images"));
    let news_output_path =
        PathBuf::from(or_default("NEWSIMG_NEWS_OUTPUT", "./docs/news_feed.json"));

    let image_max_side = parse_u32("NEWSIMG_MAX_SIDE", "900")?;
    let search_page_size = parse_u32("NEWSIMG_PAGE_SIZE", "15")?;
    let keyword_limit = parse_usize("NEWSIMG_KEYWORD_LIMIT", "6")?;

    let search_timeout_secs = parse_u64("NEWSIMG_SEARCH_TIMEOUT_SECS", "15")?;
    let download_timeout_secs = parse_u64("NEWSIMG_DOWNLOAD_TIMEOUT_SECS", "20")?;
    let download_max_bytes = parse_u64("NEWSIMG_MAX_DOWNLOAD_BYTES", "20971520")?;
    let feed_timeout_secs = parse_u64("NEWSIMG_FEED_TIMEOUT_SECS", "20")?;
    let user_agent = or_default("NEWSIMG_USER_AGENT", "ThirdDegreeMedia/1.0 (newsimg)");
    let openverse_base_url =
        or_default("NEWSIMG_OPENVERSE_URL", "https://api.openverse.engineering/");

    let max_items_per_feed = parse_usize("NEWSIMG_MAX_ITEMS_PER_FEED", "15")?;
    let max_summary_chars = parse_usize("NEWSIMG_MAX_SUMMARY_CHARS", "260")?;

    let db_max_connections = parse_u32("NEWSIMG_DB_MAX_CONNECTIONS", "4")?;
    let db_acquire_timeout_secs = parse_u64("NEWSIMG_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if image_max_side == 0 {
        return Err(ConfigError::Validation(
            "NEWSIMG_MAX_SIDE must be greater than zero".to_string(),
        ));
    }
    if search_page_size == 0 {
        return Err(ConfigError::Validation(
            "NEWSIMG_PAGE_SIZE must be greater than zero".to_string(),
        ));
    }
    if download_max_bytes == 0 {
        return Err(ConfigError::Validation(
            "NEWSIMG_MAX_DOWNLOAD_BYTES must be greater than zero".to_string(),
        ));
    }
    if db_max_connections == 0 {
        return Err(ConfigError::Validation(
            "NEWSIMG_DB_MAX_CONNECTIONS must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        feeds_path,
        policy_path,
        image_dir,
        news_output_path,
        image_max_side,
        search_page_size,
        keyword_limit,
        search_timeout_secs,
        download_timeout_secs,
        download_max_bytes,
        feed_timeout_secs,
        user_agent,
        openverse_base_url,
        max_items_per_feed,
        max_summary_chars,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSIMG_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
