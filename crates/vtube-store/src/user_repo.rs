//! User repository.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use vtube_models::{User, UserId};

use crate::db::Db;
use crate::error::StoreResult;

/// Repository for user rows.
#[derive(Clone)]
pub struct UserRepository {
    db: Db,
}

impl UserRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a user with a unique handle.
    ///
    /// A taken handle surfaces as a constraint error from the unique index.
    pub async fn create(&self, username: &str) -> StoreResult<User> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO users (username, created_at, updated_at)
             VALUES (?, ?, ?)
             RETURNING id, username, created_at, updated_at",
        )
        .bind(username)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        let user = user_from_row(&row)?;
        info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// Delete a user. Cascades to their videos and to every follow/like
    /// edge with the user as an endpoint. Returns whether a row existed.
    pub async fn delete(&self, id: UserId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.db.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted user {}", id);
        }
        Ok(deleted)
    }
}

/// Map a user row to the model.
pub(crate) fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId(row.try_get("id")?),
        username: row.try_get("username")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
