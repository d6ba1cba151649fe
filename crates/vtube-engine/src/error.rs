//! Engine error taxonomy.
//!
//! Four stable kinds, mapped from store-level failures: absent entities,
//! self-directed actions, duplicate likes, and transient store trouble.
//! Idempotent no-ops (repeated follow, unfollow of nothing) are not
//! errors and never appear here.

use thiserror::Error;

use vtube_store::StoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced to the engine's callers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Self action: {0}")]
    SelfAction(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

/// Stable error kind for the routing layer's status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    SelfAction,
    Conflict,
    Transient,
}

impl EngineError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn self_action(msg: impl Into<String>) -> Self {
        Self::SelfAction(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::SelfAction(_) => ErrorKind::SelfAction,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::Store(_) => ErrorKind::Transient,
        }
    }

    /// True when the caller is at fault; false for server-side failures.
    /// The engine never retries either way.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EngineError::Store(_))
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => EngineError::NotFound(msg),
            StoreError::SelfFollow => {
                EngineError::SelfAction("cannot follow yourself".to_string())
            }
            StoreError::Constraint(msg) => EngineError::Conflict(msg),
            other => EngineError::Store(other),
        }
    }
}
