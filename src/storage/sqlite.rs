//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{AssetRecord, RunRecord, RunStatus};
use crate::ChefError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, last_step";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ChefError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ChefError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, ChefError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        last_step: row.get(5)?,
    })
}

fn asset_from_row(row: &Row<'_>) -> rusqlite::Result<AssetRecord> {
    let bytes: i64 = row.get(2)?;
    Ok(AssetRecord {
        path: row.get(0)?,
        url: row.get(1)?,
        bytes: u64::try_from(bytes).unwrap_or_default(),
        sha256: row.get(3)?,
        downloaded_at: row.get(4)?,
        run_id: row.get(5)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS))?;

        stmt.query_row(params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM runs ORDER BY id DESC LIMIT 1",
            RUN_COLUMNS
        ))?;

        Ok(stmt.query_row([], run_from_row).optional()?)
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, last_step: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, last_step = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, last_step, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn count_runs_by_status(&self, status: RunStatus) -> StorageResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM runs WHERE status = ?1",
            params![status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ===== Asset Management =====

    fn record_asset(&mut self, asset: &AssetRecord) -> StorageResult<()> {
        let bytes = i64::try_from(asset.bytes).map_err(|_| StorageError::OutOfRange {
            column: "bytes",
            value: asset.bytes,
        })?;

        self.conn.execute(
            "INSERT OR REPLACE INTO assets (path, url, bytes, sha256, downloaded_at, run_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                asset.path,
                asset.url,
                bytes,
                asset.sha256,
                asset.downloaded_at,
                asset.run_id
            ],
        )?;
        Ok(())
    }

    fn get_asset(&self, path: &str) -> StorageResult<Option<AssetRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, url, bytes, sha256, downloaded_at, run_id FROM assets WHERE path = ?1",
        )?;

        Ok(stmt.query_row(params![path], asset_from_row).optional()?)
    }

    fn count_assets(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn total_asset_bytes(&self) -> StorageResult<u64> {
        let total: i64 =
            self.conn
                .query_row("SELECT COALESCE(SUM(bytes), 0) FROM assets", [], |row| {
                    row.get(0)
                })?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
