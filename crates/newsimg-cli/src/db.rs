//! The `db` maintenance commands.

use anyhow::Context;
use newsimg_core::AppConfig;
use newsimg_db::PoolConfig;

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = newsimg_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    let applied = newsimg_db::run_migrations(&pool)
        .await
        .context("migration failed")?;
    println!("applied {applied} migration(s)");
    Ok(())
}

pub(crate) async fn run_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = newsimg_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    newsimg_db::ping(&pool).await.context("ping failed")?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_list(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = crate::open_store(config).await?;
    let total = newsimg_db::count_images(&pool).await?;
    let rows = newsimg_db::list_recent_images(&pool, limit.max(0)).await?;

    println!("{total} cached image(s)");
    for row in rows {
        let thumb = if row.used_thumbnail { " (thumbnail)" } else { "" };
        println!(
            "{}  {:<8} {:<10} {}  {}{thumb}",
            row.created_at.format("%Y-%m-%d %H:%M"),
            row.license,
            row.source,
            row.story_slug,
            row.thumb_path,
        );
    }
    Ok(())
}
