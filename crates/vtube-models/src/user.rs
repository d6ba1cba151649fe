//! User record.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// A registered user.
///
/// Follower/following relationships are not stored on the user itself;
/// they are explicit [`crate::FollowEdge`] rows with the user as an
/// endpoint. No credential material is ever carried on this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Unique handle
    pub username: String,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
