//! Storage module for the run ledger
//!
//! This module keeps a small SQLite record of every crawl, including:
//! - Run tracking (start, finish, status and the last step of failed runs)
//! - One asset row per downloaded document, with its size and checksum
//!
//! The ledger is informational. The download cache decides what to fetch
//! from the filesystem alone, so a deleted database never causes
//! re-downloads.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::ChefError;

use std::path::Path;

/// Initializes or opens a ledger database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ChefError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ChefError> {
    SqliteStorage::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    /// Step the run was on when it failed
    pub last_step: Option<String>,
}

/// A downloaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Destination path, unique across the ledger
    pub path: String,
    pub url: String,
    pub bytes: u64,
    pub sha256: String,
    pub downloaded_at: String,
    pub run_id: i64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
