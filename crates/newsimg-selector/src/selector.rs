use std::path::{Path, PathBuf};

use chrono::Utc;
use newsimg_core::{
    attribution, extract_keywords, normalize_license, render_fragment, select_best, AppConfig,
    ImageAttribution, ImageCandidate, ImageRecord, ScoringPolicy, StoryKey,
    DEFAULT_KEYWORD_LIMIT,
};
use newsimg_db::{get_image_by_slug, insert_image, replace_image, InsertOutcome};
use newsimg_openverse::OpenverseClient;
use sqlx::SqlitePool;

use crate::error::SelectorError;
use crate::rendition::{extension_for, render, Rendition};

const SHORT_TITLE_CHARS: usize = 80;

/// Tunables for [`Selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Longest side of the display rendition.
    pub max_side: u32,
    pub page_size: u32,
    pub keyword_limit: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_side: 900,
            page_size: 15,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
        }
    }
}

impl SelectorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_side: config.image_max_side,
            page_size: config.search_page_size,
            keyword_limit: config.keyword_limit,
        }
    }
}

/// A resolved story image.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub fragment: String,
    pub record: ImageRecord,
    /// `true` when the record came from the cache without any network access.
    pub cache_hit: bool,
}

/// Chooses, downloads, and caches one image per story.
#[derive(Debug, Clone)]
pub struct Selector {
    pool: SqlitePool,
    client: OpenverseClient,
    policy: ScoringPolicy,
    config: SelectorConfig,
}

/// Files produced for one story, ready to be written.
struct Fetched {
    record: ImageRecord,
    story_dir: PathBuf,
    original: (PathBuf, Vec<u8>),
    display: (PathBuf, Vec<u8>),
}

/// Image files written to a private directory inside the story directory.
///
/// Nothing is visible at the final paths until [`Staged::commit`]. Dropping
/// an uncommitted `Staged` deletes the files.
struct Staged {
    dir: tempfile::TempDir,
    moves: Vec<(PathBuf, PathBuf)>,
}

impl Staged {
    async fn commit(self) -> Result<(), SelectorError> {
        for (from, to) in &self.moves {
            tokio::fs::rename(from, to)
                .await
                .map_err(|source| SelectorError::Io {
                    path: to.clone(),
                    source,
                })?;
        }
        drop(self.dir);
        Ok(())
    }
}

impl Selector {
    #[must_use]
    pub fn new(
        pool: SqlitePool,
        client: OpenverseClient,
        policy: ScoringPolicy,
        config: SelectorConfig,
    ) -> Self {
        Self {
            pool,
            client,
            policy,
            config,
        }
    }

    /// Returns the cached image for `title`, or finds, stores, and returns a
    /// new one.
    ///
    /// A cache hit performs no network access. On a miss the first record
    /// committed for the story key wins: if another writer got there first,
    /// its record is returned and its files are left untouched.
    ///
    /// # Errors
    ///
    /// See [`SelectorError`]; [`SelectorError::is_skippable`] separates
    /// per-story failures from store and filesystem failures.
    pub async fn resolve(
        &self,
        title: &str,
        summary: Option<&str>,
        tags: &[String],
        output_dir: &Path,
    ) -> Result<Resolution, SelectorError> {
        let key = StoryKey::from_title(title);

        if let Some(row) = get_image_by_slug(&self.pool, key.as_str()).await? {
            tracing::debug!(story_key = %key, "image cache hit");
            let record = ImageRecord::from(row);
            return Ok(Resolution {
                fragment: render_fragment(&record, title),
                record,
                cache_hit: true,
            });
        }

        let fetched = self.fetch(&key, title, summary, tags, output_dir).await?;
        let staged = stage_files(&fetched).await?;

        let record = match insert_image(&self.pool, &fetched.record).await? {
            InsertOutcome::Inserted(row) => {
                staged.commit().await?;
                tracing::info!(
                    story_key = %key,
                    source = %row.source,
                    license = %row.license,
                    "cached new story image"
                );
                ImageRecord::from(row)
            }
            InsertOutcome::AlreadyPresent(row) => {
                drop(staged);
                tracing::debug!(story_key = %key, "story image committed concurrently, using existing");
                ImageRecord::from(row)
            }
        };

        Ok(Resolution {
            fragment: render_fragment(&record, title),
            record,
            cache_hit: false,
        })
    }

    /// Like [`Selector::resolve`] but ignores any cached record and replaces
    /// it with a fresh selection.
    ///
    /// Files of the replaced record that the new record no longer points at
    /// are deleted.
    ///
    /// # Errors
    ///
    /// Same as [`Selector::resolve`].
    pub async fn refresh(
        &self,
        title: &str,
        summary: Option<&str>,
        tags: &[String],
        output_dir: &Path,
    ) -> Result<Resolution, SelectorError> {
        let key = StoryKey::from_title(title);
        let previous = get_image_by_slug(&self.pool, key.as_str()).await?;
        let fetched = self.fetch(&key, title, summary, tags, output_dir).await?;
        let staged = stage_files(&fetched).await?;

        let record = ImageRecord::from(replace_image(&self.pool, &fetched.record).await?);
        staged.commit().await?;
        if let Some(previous) = previous {
            remove_stale_files(&previous.file_path, &previous.thumb_path, &record).await;
        }
        tracing::info!(story_key = %key, "replaced story image");

        Ok(Resolution {
            fragment: render_fragment(&record, title),
            record,
            cache_hit: false,
        })
    }

    /// Structured attribution for a resolved record, with the story title as
    /// alt text.
    #[must_use]
    pub fn attribution(&self, title: &str, record: &ImageRecord) -> ImageAttribution {
        attribution(record, title)
    }

    async fn fetch(
        &self,
        key: &StoryKey,
        title: &str,
        summary: Option<&str>,
        tags: &[String],
        output_dir: &Path,
    ) -> Result<Fetched, SelectorError> {
        if !key.is_stable() {
            tracing::warn!(
                story_key = %key,
                title = %short_title(title),
                "title has no usable characters; story key will not be reused"
            );
        }

        let terms = extract_keywords(title, summary, tags, self.config.keyword_limit);
        let candidates = self.search(title, &terms).await?;

        let (index, score) = select_best(&candidates, &terms, &self.policy).ok_or_else(|| {
            SelectorError::NoUsableImage {
                query: title.to_string(),
            }
        })?;
        let best = &candidates[index];
        tracing::debug!(
            story_key = %key,
            candidates = candidates.len(),
            score,
            provider = %best.provider,
            "selected candidate"
        );

        let (asset_url, used_thumbnail) =
            best.asset_url()
                .ok_or_else(|| SelectorError::NoRetrievableAsset {
                    story_key: key.to_string(),
                })?;
        if used_thumbnail {
            tracing::warn!(
                story_key = %key,
                url = asset_url,
                "candidate has no full-size URL, falling back to thumbnail"
            );
        }

        let bytes = self
            .client
            .download(asset_url)
            .await
            .map_err(SelectorError::Download)?;

        let max_side = self.config.max_side;
        let (bytes, rendition) = tokio::task::spawn_blocking(move || {
            let rendition = render(&bytes, max_side);
            (bytes, rendition)
        })
        .await?;
        let rendition = rendition?;

        let story_dir = output_dir.join(key.as_str());
        let file_path = story_dir.join(format!("image.{}", extension_for(&bytes)));
        let display_path = story_dir.join(format!("image_{max_side}.jpg"));

        let record = build_record(
            key,
            best,
            &rendition,
            used_thumbnail,
            &file_path,
            &display_path,
        );

        Ok(Fetched {
            record,
            story_dir,
            original: (file_path, bytes),
            display: (display_path, rendition.jpeg),
        })
    }

    /// Keyword query first, then the raw title when the keyword query came
    /// back empty and differs from it.
    async fn search(
        &self,
        title: &str,
        terms: &[String],
    ) -> Result<Vec<ImageCandidate>, SelectorError> {
        let title = title.trim();
        let query = if terms.is_empty() {
            title.to_string()
        } else {
            terms.join(" ")
        };

        let mut candidates = self
            .client
            .search_images(&query, self.config.page_size)
            .await
            .map_err(SelectorError::Search)?;

        if candidates.is_empty() && query != title {
            tracing::debug!(query = %query, "no results for keyword query, retrying with title");
            candidates = self
                .client
                .search_images(title, self.config.page_size)
                .await
                .map_err(SelectorError::Search)?;
        }

        if candidates.is_empty() {
            return Err(SelectorError::NoUsableImage { query });
        }
        Ok(candidates)
    }
}

fn build_record(
    key: &StoryKey,
    best: &ImageCandidate,
    rendition: &Rendition,
    used_thumbnail: bool,
    file_path: &Path,
    display_path: &Path,
) -> ImageRecord {
    ImageRecord {
        story_key: key.to_string(),
        title: best.title.clone(),
        creator: best
            .creator
            .clone()
            .or_else(|| best.creator_url.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        license: normalize_license(&best.license),
        license_url: best.license_url.clone(),
        source: best.provider.clone(),
        source_url: best
            .landing_url
            .clone()
            .or_else(|| best.creator_url.clone()),
        file_path: path_string(file_path),
        display_path: path_string(display_path),
        width: best.width.unwrap_or(rendition.source_width),
        height: best.height.unwrap_or(rendition.source_height),
        used_thumbnail,
        created_at: Utc::now(),
    }
}

/// Forward slashes on every platform so stored paths work as URLs.
fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

async fn stage_files(fetched: &Fetched) -> Result<Staged, SelectorError> {
    let story_dir = &fetched.story_dir;
    let io_error = |source| SelectorError::Io {
        path: story_dir.clone(),
        source,
    };

    tokio::fs::create_dir_all(story_dir).await.map_err(io_error)?;
    let dir = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(story_dir)
        .map_err(io_error)?;

    let mut moves = Vec::with_capacity(2);
    for (i, (final_path, bytes)) in [&fetched.original, &fetched.display]
        .into_iter()
        .enumerate()
    {
        let staged = dir.path().join(format!("{i}.part"));
        tokio::fs::write(&staged, bytes)
            .await
            .map_err(|source| SelectorError::Io {
                path: staged.clone(),
                source,
            })?;
        moves.push((staged, final_path.clone()));
    }

    Ok(Staged { dir, moves })
}

/// Deletes the old record's files unless the new record reuses the path.
/// Failures are logged; the new record is already committed.
async fn remove_stale_files(old_file: &str, old_display: &str, current: &ImageRecord) {
    for old in [old_file, old_display] {
        if old == current.file_path || old == current.display_path {
            continue;
        }
        match tokio::fs::remove_file(old).await {
            Ok(()) => tracing::debug!(path = old, "removed replaced image file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = old, error = %e, "could not remove replaced image file"),
        }
    }
}

/// First 80 characters of a title, for log lines.
#[must_use]
pub fn short_title(title: &str) -> String {
    title.chars().take(SHORT_TITLE_CHARS).collect()
}
