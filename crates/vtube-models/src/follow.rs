//! Social-graph edge records and relationship annotations.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::id::{UserId, VideoId};
use crate::user::User;

/// A directed follow relationship: `follower` watches `following`'s uploads.
///
/// A first-class row with its own ID and creation timestamp (not a bare
/// join table) so that follower growth can be measured against a point in
/// time. (A follows B) and (B follows A) are independent edges; both
/// existing is a mutual follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    /// Edge ID (monotone with creation order)
    pub id: i64,

    /// The user doing the following
    pub follower_id: UserId,

    /// The user being followed
    pub following_id: UserId,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

/// A like on a video, unique per (user, video) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeEdge {
    /// Edge ID
    pub id: i64,

    /// The user who liked
    pub user_id: UserId,

    /// The liked video
    pub video_id: VideoId,

    /// When the like was created
    pub created_at: DateTime<Utc>,
}

/// Follower/following totals for a profile header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipCounts {
    pub followers: i64,
    pub following: i64,
}

/// A user in a follower/following list, annotated with the *viewer's*
/// relationship to them.
///
/// `is_following` — does the viewer follow this user. `is_mutual` — does
/// this user also follow the viewer back (both directions, relative to the
/// viewer, regardless of whose list is being rendered). Both are always
/// false for an anonymous viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedUser {
    #[serde(flatten)]
    pub user: User,

    pub is_following: bool,

    pub is_mutual: bool,
}
