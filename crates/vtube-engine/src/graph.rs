//! Graph query service.
//!
//! Answers relationship questions for profile views without exposing raw
//! edges: follow status, follower/following totals, and annotated lists.

use vtube_models::{AnnotatedUser, RelationshipCounts, UserId, Viewer};
use vtube_store::{Db, FollowRepository, UserRepository};

use crate::error::{EngineError, EngineResult};

/// Read-side queries over the social graph.
#[derive(Clone)]
pub struct GraphQueryService {
    users: UserRepository,
    follows: FollowRepository,
}

impl GraphQueryService {
    /// Create a new graph query service.
    pub fn new(db: Db) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            follows: FollowRepository::new(db),
        }
    }

    /// Does the viewer follow `target`? Anonymous viewers never follow
    /// anyone; that is an answer, not an error.
    pub async fn is_following(&self, viewer: &Viewer, target: UserId) -> EngineResult<bool> {
        match viewer.user_id() {
            Some(id) => Ok(self.follows.is_following(id, target).await?),
            None => Ok(false),
        }
    }

    /// Follower/following totals for a user's profile header.
    pub async fn relationship_counts(&self, user: UserId) -> EngineResult<RelationshipCounts> {
        self.require_user(user).await?;
        Ok(self.follows.counts(user).await?)
    }

    /// Users `subject` follows, in edge-creation order, each annotated
    /// with the viewer's relationship to them.
    pub async fn annotated_following(
        &self,
        viewer: &Viewer,
        subject: UserId,
    ) -> EngineResult<Vec<AnnotatedUser>> {
        self.require_user(subject).await?;
        let listed = self.follows.following(subject).await?;
        self.annotate(viewer, listed.into_iter().map(|(_, user)| user)).await
    }

    /// Users following `subject`, in edge-creation order, each annotated
    /// with the viewer's relationship to them.
    pub async fn annotated_followers(
        &self,
        viewer: &Viewer,
        subject: UserId,
    ) -> EngineResult<Vec<AnnotatedUser>> {
        self.require_user(subject).await?;
        let listed = self.follows.followers(subject).await?;
        self.annotate(viewer, listed.into_iter().map(|(_, user)| user)).await
    }

    /// Annotate a list of users with the viewer's perspective.
    ///
    /// `is_following`: viewer -> user edge exists. `is_mutual`: both
    /// directions exist between viewer and user. Both relative to the
    /// viewer, never to the subject whose list is being rendered.
    async fn annotate(
        &self,
        viewer: &Viewer,
        users: impl Iterator<Item = vtube_models::User>,
    ) -> EngineResult<Vec<AnnotatedUser>> {
        let (viewer_follows, follows_viewer) = match viewer.user_id() {
            Some(id) => (
                self.follows.following_ids(id).await?,
                self.follows.follower_ids(id).await?,
            ),
            None => Default::default(),
        };

        Ok(users
            .map(|user| {
                let is_following = viewer_follows.contains(&user.id);
                let is_mutual = is_following && follows_viewer.contains(&user.id);
                AnnotatedUser {
                    user,
                    is_following,
                    is_mutual,
                }
            })
            .collect())
    }

    async fn require_user(&self, id: UserId) -> EngineResult<()> {
        self.users
            .get(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::not_found(format!("user {id} not found")))
    }
}
