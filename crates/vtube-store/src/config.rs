//! Store configuration.

use std::path::PathBuf;

/// Relational store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file path; `None` selects an in-memory database
    pub database_path: Option<PathBuf>,
    /// Connection pool size
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: Some(PathBuf::from("vtube.db")),
            max_connections: 5,
        }
    }
}

/// `VTUBE_DB_PATH` value selecting an in-memory database.
const MEMORY_SENTINEL: &str = ":memory:";

impl StoreConfig {
    /// Create config from environment variables.
    ///
    /// `VTUBE_DB_PATH` names the database file; the SQLite-style
    /// `:memory:` value selects an in-memory database instead.
    pub fn from_env() -> Self {
        let database_path = match std::env::var("VTUBE_DB_PATH") {
            Ok(path) if path == MEMORY_SENTINEL => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from("vtube.db")),
        };
        Self {
            database_path,
            max_connections: std::env::var("VTUBE_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Config for an in-memory database (useful for tests).
    pub fn in_memory() -> Self {
        Self {
            database_path: None,
            max_connections: 1,
        }
    }
}
