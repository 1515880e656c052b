use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod db;
mod feeds;
mod image;

#[derive(Debug, Parser)]
#[command(name = "newsimg")]
#[command(about = "Pick, cache, and credit openly licensed images for news stories")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the image for one story and print its attribution markup
    Image {
        /// Story title; also the cache key and the image alt text
        #[arg(long)]
        title: String,
        /// Story summary or lede paragraph
        #[arg(long)]
        summary: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Image output directory (defaults to NEWSIMG_IMAGE_DIR)
        #[arg(long)]
        outdir: Option<PathBuf>,
        /// Ignore the cached record and select a new image
        #[arg(long)]
        refresh: bool,
        /// Print structured attribution JSON instead of HTML
        #[arg(long)]
        json: bool,
    },
    /// Aggregate the configured RSS/Atom feeds into one JSON document
    Feeds {
        /// Output path (defaults to NEWSIMG_NEWS_OUTPUT)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Resolve an image for every story
        #[arg(long)]
        with_images: bool,
        /// Fetch and print a summary without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Image cache maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Create the cache schema if needed
    Migrate,
    /// Check that the cache database is reachable
    Ping,
    /// Show the most recently cached images
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = newsimg_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    let development = config.env.is_development();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(development)
        .with_target(development)
        .init();

    match cli.command {
        Some(Commands::Image {
            title,
            summary,
            tags,
            outdir,
            refresh,
            json,
        }) => {
            let args = image::ImageArgs {
                title,
                summary,
                tags: clean_tags(tags),
                outdir,
                refresh,
                json,
            };
            image::run_image(&config, args).await?;
        }
        Some(Commands::Feeds {
            output,
            with_images,
            dry_run,
        }) => feeds::run_feeds(&config, output, with_images, dry_run).await?,
        Some(Commands::Db { command }) => match command {
            DbCommands::Migrate => db::run_migrate(&config).await?,
            DbCommands::Ping => db::run_ping(&config).await?,
            DbCommands::List { limit } => db::run_list(&config, limit).await?,
        },
        None => println!("newsimg: no command given (try --help)"),
    }

    Ok(())
}

/// Trims tags and drops empty ones (`--tags "a, ,b"` → `["a", "b"]`).
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Opens the image cache, creating the database and schema if needed.
async fn open_store(config: &newsimg_core::AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool_config = newsimg_db::PoolConfig::from_app_config(config);
    newsimg_db::open_store(&config.database_url, pool_config)
        .await
        .with_context(|| format!("failed to open image cache at {}", config.database_url))
}
