//! Database operations for the `images` cache table.

use chrono::{DateTime, Utc};
use newsimg_core::ImageRecord;
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `images` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ImageRow {
    pub id: i64,
    pub story_slug: String,
    pub title: String,
    pub creator: String,
    pub license: String,
    pub license_url: Option<String>,
    pub source: String,
    pub source_url: Option<String>,
    /// Path of the display rendition.
    pub thumb_path: String,
    pub file_path: String,
    pub width: i64,
    pub height: i64,
    pub used_thumbnail: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ImageRow> for ImageRecord {
    fn from(row: ImageRow) -> Self {
        Self {
            story_key: row.story_slug,
            title: row.title,
            creator: row.creator,
            license: row.license,
            license_url: row.license_url,
            source: row.source,
            source_url: row.source_url,
            file_path: row.file_path,
            display_path: row.thumb_path,
            width: u32::try_from(row.width).unwrap_or(0),
            height: u32::try_from(row.height).unwrap_or(0),
            used_thumbnail: row.used_thumbnail,
            created_at: row.created_at,
        }
    }
}

/// Result of [`insert_image`].
///
/// The first committed record for a slug wins: inserting again never
/// overwrites, it hands back the row that is already stored.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(ImageRow),
    AlreadyPresent(ImageRow),
}

impl InsertOutcome {
    /// The row that is now committed for the slug, whichever way it got there.
    #[must_use]
    pub fn into_row(self) -> ImageRow {
        match self {
            Self::Inserted(row) | Self::AlreadyPresent(row) => row,
        }
    }

    #[must_use]
    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

const IMAGE_COLUMNS: &str = "id, story_slug, title, creator, license, license_url, source, \
     source_url, thumb_path, file_path, width, height, used_thumbnail, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the cached image for a story slug, or `None` if there is none yet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_image_by_slug(
    pool: &SqlitePool,
    story_slug: &str,
) -> Result<Option<ImageRow>, DbError> {
    let row = sqlx::query_as::<_, ImageRow>(&format!(
        "SELECT {IMAGE_COLUMNS} FROM images WHERE story_slug = ?1"
    ))
    .bind(story_slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a record unless its slug is already cached.
///
/// Uniqueness is enforced by the `story_slug` constraint inside a single
/// statement, so concurrent writers still observe one winner.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails, or [`DbError::NotFound`] if
/// the conflicting row disappeared between the insert and the read-back.
pub async fn insert_image(
    pool: &SqlitePool,
    record: &ImageRecord,
) -> Result<InsertOutcome, DbError> {
    let inserted = sqlx::query_as::<_, ImageRow>(&format!(
        "INSERT INTO images \
           (story_slug, title, creator, license, license_url, source, source_url, \
            thumb_path, file_path, width, height, used_thumbnail, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
         ON CONFLICT (story_slug) DO NOTHING \
         RETURNING {IMAGE_COLUMNS}"
    ))
    .bind(&record.story_key)
    .bind(&record.title)
    .bind(&record.creator)
    .bind(&record.license)
    .bind(record.license_url.as_deref())
    .bind(&record.source)
    .bind(record.source_url.as_deref())
    .bind(&record.display_path)
    .bind(&record.file_path)
    .bind(i64::from(record.width))
    .bind(i64::from(record.height))
    .bind(record.used_thumbnail)
    .bind(record.created_at)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = inserted {
        return Ok(InsertOutcome::Inserted(row));
    }

    let existing = get_image_by_slug(pool, &record.story_key)
        .await?
        .ok_or(DbError::NotFound)?;
    Ok(InsertOutcome::AlreadyPresent(existing))
}

/// Replaces every column of the record stored for the slug, inserting it if
/// absent. This is the only way a committed record changes.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn replace_image(pool: &SqlitePool, record: &ImageRecord) -> Result<ImageRow, DbError> {
    let row = sqlx::query_as::<_, ImageRow>(&format!(
        "INSERT INTO images \
           (story_slug, title, creator, license, license_url, source, source_url, \
            thumb_path, file_path, width, height, used_thumbnail, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
         ON CONFLICT (story_slug) DO UPDATE SET \
           title = excluded.title, \
           creator = excluded.creator, \
           license = excluded.license, \
           license_url = excluded.license_url, \
           source = excluded.source, \
           source_url = excluded.source_url, \
           thumb_path = excluded.thumb_path, \
           file_path = excluded.file_path, \
           width = excluded.width, \
           height = excluded.height, \
           used_thumbnail = excluded.used_thumbnail, \
           created_at = excluded.created_at \
         RETURNING {IMAGE_COLUMNS}"
    ))
    .bind(&record.story_key)
    .bind(&record.title)
    .bind(&record.creator)
    .bind(&record.license)
    .bind(record.license_url.as_deref())
    .bind(&record.source)
    .bind(record.source_url.as_deref())
    .bind(&record.display_path)
    .bind(&record.file_path)
    .bind(i64::from(record.width))
    .bind(i64::from(record.height))
    .bind(record.used_thumbnail)
    .bind(record.created_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the number of cached images.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_images(pool: &SqlitePool) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM images")
        .fetch_one(pool)
        .await?)
}

/// Returns the most recently cached images, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_images(pool: &SqlitePool, limit: i64) -> Result<Vec<ImageRow>, DbError> {
    let rows = sqlx::query_as::<_, ImageRow>(&format!(
        "SELECT {IMAGE_COLUMNS} FROM images ORDER BY created_at DESC, id DESC LIMIT ?1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
