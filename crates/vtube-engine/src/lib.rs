//! Social-graph and view-attribution engine.
//!
//! This crate provides the three services consumed by the routing layer:
//! - [`GraphQueryService`] — follow-status checks, relationship counts,
//!   and follower/following lists annotated with reciprocity
//! - [`ViewAttributionService`] — per-view classification, counter
//!   updates, and the derived fan-view/follower-growth analytics
//! - [`EngagementGuard`] — user-facing follow/unfollow/like/unlike
//!   semantics on top of the store's idempotent edge operations
//!
//! Every service takes a [`vtube_store::Db`] handle at construction; the
//! engine itself holds no mutable state, so a service value can be cloned
//! freely across concurrent requests.

pub mod attribution;
pub mod engagement;
pub mod error;
pub mod graph;

pub use attribution::ViewAttributionService;
pub use engagement::EngagementGuard;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use graph::GraphQueryService;
