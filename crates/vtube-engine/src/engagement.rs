//! Engagement guard.
//!
//! Translates store-level edge idempotency into user-facing semantics.
//! Follow and like deliberately diverge on duplicates: repeating a follow
//! is reported as success, repeating a like is a conflict.

use tracing::debug;

use vtube_models::{UserId, VideoId};
use vtube_store::{Db, FollowRepository, LikeRepository, StoreError};

use crate::error::{EngineError, EngineResult};

/// Validates and applies follow/like actions.
#[derive(Clone)]
pub struct EngagementGuard {
    follows: FollowRepository,
    likes: LikeRepository,
}

impl EngagementGuard {
    /// Create a new engagement guard.
    pub fn new(db: Db) -> Self {
        Self {
            follows: FollowRepository::new(db.clone()),
            likes: LikeRepository::new(db),
        }
    }

    /// Follow a user.
    ///
    /// Self-follow is rejected; an existing edge reports success without
    /// creating a duplicate. A uniqueness violation raised by a concurrent
    /// insert of the same pair is treated as that same idempotent-success
    /// case.
    pub async fn follow(&self, follower: UserId, following: UserId) -> EngineResult<()> {
        match self.follows.add(follower, following).await {
            Ok(inserted) => {
                if !inserted {
                    debug!("Follow {} -> {} already held", follower, following);
                }
                Ok(())
            }
            Err(StoreError::SelfFollow) => {
                Err(EngineError::self_action("cannot follow yourself"))
            }
            Err(err) if err.is_unique_violation() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Unfollow a user. Success whether or not an edge existed.
    pub async fn unfollow(&self, follower: UserId, following: UserId) -> EngineResult<()> {
        self.follows.remove(follower, following).await?;
        Ok(())
    }

    /// Owner-initiated removal of one of their followers. Success whether
    /// or not the edge existed.
    pub async fn remove_follower(&self, owner: UserId, follower: UserId) -> EngineResult<()> {
        let removed = self.follows.remove(follower, owner).await?;
        if removed {
            debug!("Owner {} removed follower {}", owner, follower);
        }
        Ok(())
    }

    /// Like a video. A duplicate like is a conflict, unlike the follow
    /// path's idempotent success.
    pub async fn like(&self, user: UserId, video: VideoId) -> EngineResult<()> {
        let inserted = match self.likes.add(user, video).await {
            Ok(inserted) => inserted,
            // Concurrent duplicate insert; same answer as a sequential one.
            Err(err) if err.is_unique_violation() => false,
            Err(err) => return Err(err.into()),
        };
        if !inserted {
            return Err(EngineError::conflict(format!(
                "video {video} already liked"
            )));
        }
        Ok(())
    }

    /// Unlike a video. Fails when no like exists.
    pub async fn unlike(&self, user: UserId, video: VideoId) -> EngineResult<()> {
        let removed = self.likes.remove(user, video).await?;
        if !removed {
            return Err(EngineError::not_found(format!(
                "like on video {video} not found"
            )));
        }
        Ok(())
    }
}
