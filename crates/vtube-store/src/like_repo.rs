//! Like edge repository.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info};

use vtube_models::{LikeEdge, UserId, VideoId};

use crate::db::Db;
use crate::error::StoreResult;
use crate::metrics;

/// Repository for like edges, unique per (user, video) pair.
#[derive(Clone)]
pub struct LikeRepository {
    db: Db,
}

impl LikeRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a like edge.
    ///
    /// Returns `true` when a new edge was inserted and `false` when the
    /// pair was already liked. Fails with `NotFound` when the user or the
    /// video is absent (foreign-key authority).
    pub async fn add(&self, user: UserId, video: VideoId) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO likes (user_id, video_id, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT (user_id, video_id) DO NOTHING",
        )
        .bind(user.as_i64())
        .bind(video.as_i64())
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            metrics::record_edge_write("like", "add");
            info!("User {} liked video {}", user, video);
        } else {
            metrics::record_edge_duplicate("like");
            debug!("Like ({}, {}) already exists", user, video);
        }
        Ok(inserted)
    }

    /// Remove a like edge. Returns whether an edge was removed.
    pub async fn remove(&self, user: UserId, video: VideoId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND video_id = ?")
            .bind(user.as_i64())
            .bind(video.as_i64())
            .execute(self.db.pool())
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            metrics::record_edge_write("like", "remove");
            info!("User {} unliked video {}", user, video);
        }
        Ok(removed)
    }

    /// Number of likes on a video.
    pub async fn count_for_video(&self, video: VideoId) -> StoreResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM likes WHERE video_id = ?")
            .bind(video.as_i64())
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.try_get("n")?)
    }

    /// Like edges on a video, in edge-creation order, for the video
    /// detail payload.
    pub async fn list_for_video(&self, video: VideoId) -> StoreResult<Vec<LikeEdge>> {
        let rows = sqlx::query(
            "SELECT id, user_id, video_id, created_at
             FROM likes WHERE video_id = ? ORDER BY id ASC",
        )
        .bind(video.as_i64())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(like_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

/// Map a like row to the model.
fn like_from_row(row: &SqliteRow) -> Result<LikeEdge, sqlx::Error> {
    Ok(LikeEdge {
        id: row.try_get("id")?,
        user_id: UserId(row.try_get("user_id")?),
        video_id: VideoId(row.try_get("video_id")?),
        created_at: row.try_get("created_at")?,
    })
}
