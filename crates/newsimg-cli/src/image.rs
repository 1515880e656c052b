//! The `image` command and the selector wiring shared with `feeds`.

use std::path::PathBuf;

use anyhow::Context;
use newsimg_core::{AppConfig, ScoringPolicy};
use newsimg_openverse::OpenverseClient;
use newsimg_selector::{short_title, Selector, SelectorConfig};

#[derive(Debug)]
pub(crate) struct ImageArgs {
    pub title: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub outdir: Option<PathBuf>,
    pub refresh: bool,
    pub json: bool,
}

/// Loads the scoring policy file if one is configured, else the built-in
/// policy.
pub(crate) fn load_policy(config: &AppConfig) -> anyhow::Result<ScoringPolicy> {
    match &config.policy_path {
        Some(path) => newsimg_core::load_scoring_policy(path)
            .with_context(|| format!("failed to load scoring policy {}", path.display())),
        None => Ok(ScoringPolicy::default()),
    }
}

/// Builds a selector over an already-open store.
pub(crate) fn build_selector(
    pool: sqlx::SqlitePool,
    config: &AppConfig,
) -> anyhow::Result<Selector> {
    let policy = load_policy(config)?;
    let client = OpenverseClient::with_base_url(
        config.search_timeout_secs,
        config.download_timeout_secs,
        &config.user_agent,
        &config.openverse_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Openverse client: {e}"))?
    .with_max_download_bytes(config.download_max_bytes);

    Ok(Selector::new(
        pool,
        client,
        policy,
        SelectorConfig::from_app_config(config),
    ))
}

/// Resolves one story and prints the fragment (or attribution JSON) to stdout.
///
/// # Errors
///
/// Any resolution failure is returned, so the process exits non-zero even for
/// failures a batch run would skip.
pub(crate) async fn run_image(config: &AppConfig, args: ImageArgs) -> anyhow::Result<()> {
    let pool = crate::open_store(config).await?;
    let selector = build_selector(pool, config)?;
    let outdir = args.outdir.unwrap_or_else(|| config.image_dir.clone());
    let summary = args.summary.as_deref().filter(|s| !s.trim().is_empty());

    let result = if args.refresh {
        selector
            .refresh(&args.title, summary, &args.tags, &outdir)
            .await
    } else {
        selector
            .resolve(&args.title, summary, &args.tags, &outdir)
            .await
    };
    let resolution =
        result.with_context(|| format!("no image for \"{}\"", short_title(&args.title)))?;

    if args.json {
        let attribution = selector.attribution(&args.title, &resolution.record);
        println!("{}", serde_json::to_string_pretty(&attribution)?);
    } else {
        println!("{}", resolution.fragment);
    }
    Ok(())
}
