//! Pooled database handle and schema migration.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::StoreConfig;
use crate::error::StoreResult;

/// Schema statements, applied in order. All idempotent.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS videos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        url TEXT NOT NULL,
        thumbnail_url TEXT,
        views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0),
        author_views INTEGER NOT NULL DEFAULT 0 CHECK (author_views >= 0),
        follower_views INTEGER NOT NULL DEFAULT 0 CHECK (follower_views >= 0),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK (author_views + follower_views <= views)
    )",
    "CREATE TABLE IF NOT EXISTS follows (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        follower_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        following_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE (follower_id, following_id),
        CHECK (follower_id <> following_id)
    )",
    "CREATE TABLE IF NOT EXISTS likes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        video_id INTEGER NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE (user_id, video_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id)",
    "CREATE INDEX IF NOT EXISTS idx_likes_video ON likes(video_id)",
    "CREATE INDEX IF NOT EXISTS idx_videos_user ON videos(user_id)",
];

/// Cloneable handle to the relational store.
///
/// Wraps a connection pool; clones share the pool. The handle is passed
/// explicitly to every repository and service, so the engine holds no
/// process-wide mutable state.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect according to the given config and apply the schema.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let options = match &config.database_path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .foreign_keys(true),
            None => SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true),
        };

        // An in-memory SQLite database exists per connection, so it must
        // never be pooled wider than one.
        let max_connections = match &config.database_path {
            Some(_) => config.max_connections,
            None => 1,
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        match &config.database_path {
            Some(path) => info!("Opened store at {}", path.display()),
            None => info!("Opened in-memory store"),
        }
        Ok(db)
    }

    /// Open a fresh in-memory database (useful for tests).
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect(&StoreConfig::in_memory()).await
    }

    /// Apply the schema. Safe to call repeatedly.
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// The underlying pool, for repository queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
