//! Viewer identity and view classification.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The identity behind a view or a relationship query.
///
/// Credential verification happens upstream; by the time a request reaches
/// the engine it is either a verified user ID or anonymous. A missing or
/// unverifiable credential maps to `Anonymous`, never to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    /// No authenticated identity
    Anonymous,
    /// Verified user
    User(UserId),
}

impl Viewer {
    /// The authenticated user ID, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    /// Convenience constructor from an optional verified ID.
    pub fn from_user_id(id: Option<UserId>) -> Self {
        match id {
            Some(id) => Viewer::User(id),
            None => Viewer::Anonymous,
        }
    }
}

/// How a single view was attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewerClass {
    /// Viewer is the video's owner
    Author,
    /// Viewer follows the video's owner
    Follower,
    /// Authenticated but neither owner nor follower
    Other,
    /// No authenticated identity
    Anonymous,
}

impl ViewerClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerClass::Author => "author",
            ViewerClass::Follower => "follower",
            ViewerClass::Other => "other",
            ViewerClass::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for ViewerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
