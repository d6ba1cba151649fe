//! Embedded relational store for the VTube engine.
//!
//! This crate provides:
//! - A pooled SQLite handle ([`Db`]) with schema migration
//! - Typed repositories for users, videos, follow edges, and like edges
//! - Uniqueness and referential-integrity enforcement at the database level
//! - Atomic, classification-aware view counter updates
//! - Store-level error taxonomy and operation metrics
//!
//! Follow and like edges are first-class rows with their own IDs and
//! creation timestamps; duplicates are rejected by unique indexes, and
//! deleting a user or video cascades to every edge touching it.

pub mod config;
pub mod db;
pub mod error;
pub mod follow_repo;
pub mod like_repo;
pub mod metrics;
pub mod user_repo;
pub mod video_repo;

pub use config::StoreConfig;
pub use db::Db;
pub use error::{StoreError, StoreResult};
pub use follow_repo::FollowRepository;
pub use like_repo::LikeRepository;
pub use user_repo::UserRepository;
pub use video_repo::VideoRepository;
