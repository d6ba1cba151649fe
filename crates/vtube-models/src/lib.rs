//! Shared data models for the VTube backend.
//!
//! This crate provides Serde-serializable types for:
//! - User and video records (including per-video view counters)
//! - Follow and like edges of the social graph
//! - Viewer identity and view classification
//! - Relationship annotations and view-attribution analytics payloads

pub mod follow;
pub mod id;
pub mod user;
pub mod video;
pub mod viewer;

// Re-export common types
pub use follow::{AnnotatedUser, FollowEdge, LikeEdge, RelationshipCounts};
pub use id::{UserId, VideoId};
pub use user::User;
pub use video::{NewVideo, Video, VideoAnalytics};
pub use viewer::{Viewer, ViewerClass};
