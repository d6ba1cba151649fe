//! Follow edge repository.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info};

use vtube_models::{FollowEdge, RelationshipCounts, User, UserId};

use crate::db::Db;
use crate::error::{StoreError, StoreResult};
use crate::metrics;
use crate::user_repo::user_from_row;

/// Repository for directed follow edges.
///
/// Uniqueness on (follower, following) is enforced by the database index,
/// so concurrent duplicate inserts collapse into one edge. List results
/// come back in edge-creation order.
#[derive(Clone)]
pub struct FollowRepository {
    db: Db,
}

impl FollowRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a follow edge.
    ///
    /// Returns `true` when a new edge was inserted and `false` when the
    /// edge already existed (not an error; the guard layer decides how to
    /// surface it). Fails with [`StoreError::SelfFollow`] for a
    /// self-referential pair and [`StoreError::NotFound`] when either user
    /// is absent.
    pub async fn add(&self, follower: UserId, following: UserId) -> StoreResult<bool> {
        if follower == following {
            return Err(StoreError::SelfFollow);
        }

        let result = sqlx::query(
            "INSERT INTO follows (follower_id, following_id, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT (follower_id, following_id) DO NOTHING",
        )
        .bind(follower.as_i64())
        .bind(following.as_i64())
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            metrics::record_edge_write("follow", "add");
            info!("User {} now follows user {}", follower, following);
        } else {
            metrics::record_edge_duplicate("follow");
            debug!("Follow {} -> {} already exists", follower, following);
        }
        Ok(inserted)
    }

    /// Remove a follow edge. No-op when absent; returns whether an edge
    /// was removed.
    pub async fn remove(&self, follower: UserId, following: UserId) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM follows WHERE follower_id = ? AND following_id = ?",
        )
        .bind(follower.as_i64())
        .bind(following.as_i64())
        .execute(self.db.pool())
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            metrics::record_edge_write("follow", "remove");
            info!("User {} unfollowed user {}", follower, following);
        }
        Ok(removed)
    }

    /// Does the (a -> b) edge exist?
    pub async fn is_following(&self, a: UserId, b: UserId) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM follows WHERE follower_id = ? AND following_id = ?",
        )
        .bind(a.as_i64())
        .bind(b.as_i64())
        .fetch_optional(self.db.pool())
        .await?;
        Ok(row.is_some())
    }

    /// Follower/following totals for a user.
    pub async fn counts(&self, user: UserId) -> StoreResult<RelationshipCounts> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM follows WHERE following_id = ?1) AS followers,
                (SELECT COUNT(*) FROM follows WHERE follower_id = ?1) AS following",
        )
        .bind(user.as_i64())
        .fetch_one(self.db.pool())
        .await?;

        Ok(RelationshipCounts {
            followers: row.try_get("followers")?,
            following: row.try_get("following")?,
        })
    }

    /// Users who follow `user`, with their edges, in edge-creation order.
    pub async fn followers(&self, user: UserId) -> StoreResult<Vec<(FollowEdge, User)>> {
        let rows = sqlx::query(
            "SELECT f.id AS edge_id, f.follower_id, f.following_id, f.created_at AS edge_created_at,
                    u.id, u.username, u.created_at, u.updated_at
             FROM follows f
             JOIN users u ON u.id = f.follower_id
             WHERE f.following_id = ?
             ORDER BY f.id ASC",
        )
        .bind(user.as_i64())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(edge_with_user_from_row).collect()
    }

    /// Users `user` follows, with their edges, in edge-creation order.
    pub async fn following(&self, user: UserId) -> StoreResult<Vec<(FollowEdge, User)>> {
        let rows = sqlx::query(
            "SELECT f.id AS edge_id, f.follower_id, f.following_id, f.created_at AS edge_created_at,
                    u.id, u.username, u.created_at, u.updated_at
             FROM follows f
             JOIN users u ON u.id = f.following_id
             WHERE f.follower_id = ?
             ORDER BY f.id ASC",
        )
        .bind(user.as_i64())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(edge_with_user_from_row).collect()
    }

    /// The set of user IDs `user` follows.
    pub async fn following_ids(&self, user: UserId) -> StoreResult<HashSet<UserId>> {
        let rows = sqlx::query("SELECT following_id FROM follows WHERE follower_id = ?")
            .bind(user.as_i64())
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| Ok(UserId(row.try_get("following_id")?)))
            .collect::<Result<HashSet<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    /// The set of user IDs following `user`.
    pub async fn follower_ids(&self, user: UserId) -> StoreResult<HashSet<UserId>> {
        let rows = sqlx::query("SELECT follower_id FROM follows WHERE following_id = ?")
            .bind(user.as_i64())
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| Ok(UserId(row.try_get("follower_id")?)))
            .collect::<Result<HashSet<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    /// Follow edges pointing at `target` created strictly after `since`.
    pub async fn count_since(
        &self,
        target: UserId,
        since: DateTime<Utc>,
    ) -> StoreResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM follows WHERE following_id = ? AND created_at > ?",
        )
        .bind(target.as_i64())
        .bind(since)
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.try_get("n")?)
    }
}

fn edge_with_user_from_row(row: &SqliteRow) -> StoreResult<(FollowEdge, User)> {
    let edge = FollowEdge {
        id: row.try_get("edge_id")?,
        follower_id: UserId(row.try_get("follower_id")?),
        following_id: UserId(row.try_get("following_id")?),
        created_at: row.try_get("edge_created_at")?,
    };
    let user = user_from_row(row)?;
    Ok((edge, user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_repo::UserRepository;

    async fn setup_users(n: usize) -> (Db, Vec<UserId>) {
        let db = Db::in_memory().await.unwrap();
        let users = UserRepository::new(db.clone());
        let mut ids = Vec::new();
        for i in 0..n {
            ids.push(users.create(&format!("user{i}")).await.unwrap().id);
        }
        (db, ids)
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (db, ids) = setup_users(2).await;
        let repo = FollowRepository::new(db);

        assert!(repo.add(ids[0], ids[1]).await.unwrap());
        assert!(!repo.add(ids[0], ids[1]).await.unwrap());

        let counts = repo.counts(ids[1]).await.unwrap();
        assert_eq!(counts.followers, 1);
    }

    #[tokio::test]
    async fn test_self_follow_is_rejected() {
        let (db, ids) = setup_users(1).await;
        let repo = FollowRepository::new(db);

        let err = repo.add(ids[0], ids[0]).await.unwrap_err();
        assert!(matches!(err, StoreError::SelfFollow));
    }

    #[tokio::test]
    async fn test_add_with_missing_user_is_not_found() {
        let (db, ids) = setup_users(1).await;
        let repo = FollowRepository::new(db);

        let err = repo.add(ids[0], UserId(999)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edges_are_directional() {
        let (db, ids) = setup_users(2).await;
        let repo = FollowRepository::new(db);

        repo.add(ids[0], ids[1]).await.unwrap();
        assert!(repo.is_following(ids[0], ids[1]).await.unwrap());
        assert!(!repo.is_following(ids[1], ids[0]).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_is_noop_when_absent() {
        let (db, ids) = setup_users(2).await;
        let repo = FollowRepository::new(db);

        assert!(!repo.remove(ids[0], ids[1]).await.unwrap());
        repo.add(ids[0], ids[1]).await.unwrap();
        assert!(repo.remove(ids[0], ids[1]).await.unwrap());
        assert!(!repo.is_following(ids[0], ids[1]).await.unwrap());
    }

    #[tokio::test]
    async fn test_lists_preserve_edge_creation_order() {
        let (db, ids) = setup_users(4).await;
        let repo = FollowRepository::new(db);

        // Followers arrive in the order 1, 3, 2.
        repo.add(ids[1], ids[0]).await.unwrap();
        repo.add(ids[3], ids[0]).await.unwrap();
        repo.add(ids[2], ids[0]).await.unwrap();

        let followers = repo.followers(ids[0]).await.unwrap();
        let order: Vec<_> = followers.iter().map(|(_, u)| u.id).collect();
        assert_eq!(order, vec![ids[1], ids[3], ids[2]]);
    }

    #[tokio::test]
    async fn test_count_since_is_strictly_after() {
        let (db, ids) = setup_users(3).await;
        let repo = FollowRepository::new(db);

        repo.add(ids[1], ids[0]).await.unwrap();
        let cutoff = Utc::now();
        repo.add(ids[2], ids[0]).await.unwrap();

        assert_eq!(repo.count_since(ids[0], cutoff).await.unwrap(), 1);
        assert_eq!(repo.count_since(ids[0], Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_edges() {
        let (db, ids) = setup_users(3).await;
        let users = UserRepository::new(db.clone());
        let repo = FollowRepository::new(db);

        repo.add(ids[1], ids[0]).await.unwrap();
        repo.add(ids[0], ids[2]).await.unwrap();

        users.delete(ids[0]).await.unwrap();
        assert_eq!(repo.counts(ids[2]).await.unwrap().followers, 0);
        assert!(!repo.is_following(ids[1], ids[0]).await.unwrap());
    }

    #[tokio::test]
    async fn test_id_sets() {
        let (db, ids) = setup_users(3).await;
        let repo = FollowRepository::new(db);

        repo.add(ids[0], ids[1]).await.unwrap();
        repo.add(ids[0], ids[2]).await.unwrap();
        repo.add(ids[1], ids[0]).await.unwrap();

        let following = repo.following_ids(ids[0]).await.unwrap();
        assert_eq!(following, [ids[1], ids[2]].into_iter().collect());

        let followers = repo.follower_ids(ids[0]).await.unwrap();
        assert_eq!(followers, [ids[1]].into_iter().collect());
    }
}
