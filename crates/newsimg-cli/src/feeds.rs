//! The `feeds` command.
//!
//! Unreachable or malformed feeds are logged and skipped. With
//! `--with-images`, stories whose image cannot be resolved keep no image;
//! store and filesystem failures abort the run.

use std::path::PathBuf;

use anyhow::Context;
use newsimg_core::{AppConfig, FeedsFile};
use newsimg_feeds::{aggregate_feeds, write_news_feed, FeedClient, NewsFeed, ParseOptions};
use newsimg_selector::{short_title, Selector};

fn load_feed_list(config: &AppConfig) -> anyhow::Result<FeedsFile> {
    if !config.feeds_path.exists() {
        tracing::warn!(
            path = %config.feeds_path.display(),
            "feeds file not found, using built-in feed list"
        );
        return Ok(FeedsFile::default());
    }
    newsimg_core::load_feeds(&config.feeds_path)
        .with_context(|| format!("failed to load feeds from {}", config.feeds_path.display()))
}

async fn attach_images(
    selector: &Selector,
    config: &AppConfig,
    feed: &mut NewsFeed,
) -> anyhow::Result<()> {
    let mut resolved = 0_usize;
    for item in &mut feed.items {
        let summary = Some(item.summary.as_str()).filter(|s| !s.is_empty());
        let tags = vec![item.source.clone()];
        match selector
            .resolve(&item.title, summary, &tags, &config.image_dir)
            .await
        {
            Ok(resolution) => {
                item.image = Some(selector.attribution(&item.title, &resolution.record));
                resolved += 1;
            }
            Err(e) if e.is_skippable() => {
                tracing::warn!(
                    title = %short_title(&item.title),
                    error = %e,
                    "skipping story image"
                );
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("image resolution failed for \"{}\"", short_title(&item.title))
                });
            }
        }
    }
    tracing::info!(resolved, total = feed.items.len(), "attached story images");
    Ok(())
}

pub(crate) async fn run_feeds(
    config: &AppConfig,
    output: Option<PathBuf>,
    with_images: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let feeds = load_feed_list(config)?;
    let client = FeedClient::new(config.feed_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build feed client: {e}"))?;
    let options = ParseOptions {
        max_items: config.max_items_per_feed,
        max_summary_chars: config.max_summary_chars,
    };

    let mut feed = aggregate_feeds(&client, &feeds.feeds, options).await;

    if dry_run {
        println!(
            "dry-run: {} items from {} feeds",
            feed.items.len(),
            feeds.feeds.len()
        );
        for item in &feed.items {
            println!("  {}  [{}] {}", item.date.format("%Y-%m-%d"), item.source, item.title);
        }
        return Ok(());
    }

    if with_images {
        let pool = crate::open_store(config).await?;
        let selector = crate::image::build_selector(pool, config)?;
        attach_images(&selector, config, &mut feed).await?;
    }

    let path = output.unwrap_or_else(|| config.news_output_path.clone());
    write_news_feed(&path, &feed)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {} items to {}", feed.items.len(), path.display());
    Ok(())
}
