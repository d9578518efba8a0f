//! Storage traits and error types

use crate::storage::{AssetRecord, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Value out of range for column {column}: {value}")]
    OutOfRange { column: &'static str, value: u64 },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for ledger backends
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Marks a run as failed, remembering the step it stopped at
    fn fail_run(&mut self, run_id: i64, last_step: &str) -> StorageResult<()>;

    /// Counts runs in a given status
    fn count_runs_by_status(&self, status: RunStatus) -> StorageResult<usize>;

    // ===== Asset Management =====

    /// Records a downloaded document, replacing any row for the same path
    fn record_asset(&mut self, asset: &AssetRecord) -> StorageResult<()>;

    /// Gets the asset stored at `path`
    fn get_asset(&self, path: &str) -> StorageResult<Option<AssetRecord>>;

    /// Counts recorded assets
    fn count_assets(&self) -> StorageResult<usize>;

    /// Sums the size of all recorded assets
    fn total_asset_bytes(&self) -> StorageResult<u64>;
}
