//! Video repository.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info};

use vtube_models::{NewVideo, UserId, Video, VideoId, ViewerClass};

use crate::db::Db;
use crate::error::StoreResult;
use crate::metrics;

const VIDEO_COLUMNS: &str = "id, user_id, title, description, url, thumbnail_url, \
     views, author_views, follower_views, created_at, updated_at";

/// Repository for video rows and their view counters.
#[derive(Clone)]
pub struct VideoRepository {
    db: Db,
}

impl VideoRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Publish a video. The owner must exist (foreign-key authority).
    pub async fn create(&self, owner: UserId, new: &NewVideo) -> StoreResult<Video> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO videos (user_id, title, description, url, thumbnail_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {VIDEO_COLUMNS}",
        ))
        .bind(owner.as_i64())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.url)
        .bind(&new.thumbnail_url)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        let video = video_from_row(&row)?;
        info!("Created video {} for user {}", video.id, owner);
        Ok(video)
    }

    /// Get a video by ID.
    pub async fn get(&self, id: VideoId) -> StoreResult<Option<Video>> {
        let row = sqlx::query(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?"))
            .bind(id.as_i64())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(video_from_row).transpose().map_err(Into::into)
    }

    /// A user's videos, newest first.
    pub async fn list_by_user(&self, owner: UserId) -> StoreResult<Vec<Video>> {
        let rows = sqlx::query(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        ))
        .bind(owner.as_i64())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(video_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Delete a video. Cascades to its like edges. Returns whether a row
    /// existed.
    pub async fn delete(&self, id: VideoId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.db.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted video {}", id);
        }
        Ok(deleted)
    }

    /// Apply one classified view to the counters.
    ///
    /// A single UPDATE increments the total and, for author/follower views,
    /// the matching attribution counter. The increment happens inside the
    /// database, so concurrent views on the same video cannot lose counts,
    /// and a view either fully commits or not at all. Returns the updated
    /// row, or `None` when the video is gone.
    pub async fn record_view(
        &self,
        id: VideoId,
        class: ViewerClass,
    ) -> StoreResult<Option<Video>> {
        let (author_inc, follower_inc): (i64, i64) = match class {
            ViewerClass::Author => (1, 0),
            ViewerClass::Follower => (0, 1),
            ViewerClass::Other | ViewerClass::Anonymous => (0, 0),
        };

        let row = sqlx::query(&format!(
            "UPDATE videos
             SET views = views + 1,
                 author_views = author_views + ?,
                 follower_views = follower_views + ?,
                 updated_at = ?
             WHERE id = ?
             RETURNING {VIDEO_COLUMNS}",
        ))
        .bind(author_inc)
        .bind(follower_inc)
        .bind(Utc::now())
        .bind(id.as_i64())
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => {
                let video = video_from_row(&row)?;
                metrics::record_view(class.as_str());
                debug!("Recorded {} view on video {}", class, id);
                Ok(Some(video))
            }
            None => Ok(None),
        }
    }
}

/// Map a video row to the model.
pub(crate) fn video_from_row(row: &SqliteRow) -> Result<Video, sqlx::Error> {
    Ok(Video {
        id: VideoId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        views: row.try_get("views")?,
        author_views: row.try_get("author_views")?,
        follower_views: row.try_get("follower_views")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
