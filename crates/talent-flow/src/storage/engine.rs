//! SqliteTalentFlowStore: concrete `ITalentFlowStorage` over `ConnectionPool`.
//!
//! Each trait method delegates to a free function in `storage/tables.rs`,
//! routed through the writer or a reader.

use std::path::Path;

use chrono::{DateTime, Utc};
use talent_flow_core::config::StorageConfig;
use talent_flow_core::errors::StorageError;
use talent_flow_core::traits::{ITalentFlowStorage, RetentionReport, TalentFlowStorageStats};
use talent_flow_core::types::{
    AuditEvent, Contradiction, GovernanceState, Movement, RunSummary, Signal, Snapshot,
};

use super::pool::ConnectionPool;
use super::{migrations, retention, tables};

pub struct SqliteTalentFlowStore {
    pool: ConnectionPool,
}

impl SqliteTalentFlowStore {
    /// Open a file-backed store and migrate it to the current schema.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::OpenFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        // The writer must create the file and switch it to WAL before readers attach.
        let bootstrap = ConnectionPool::open(path, 0, config.effective_busy_timeout_ms())?;
        bootstrap.with_writer(migrations::migrate)?;
        drop(bootstrap);

        let pool = ConnectionPool::open(
            path,
            config.effective_read_pool_size(),
            config.effective_busy_timeout_ms(),
        )?;
        Ok(Self { pool })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let pool = ConnectionPool::open_in_memory()?;
        let store = Self { pool };
        store.migrate()?;
        Ok(store)
    }

    pub fn is_wal_mode(&self) -> bool {
        self.pool.is_wal_mode()
    }

    /// Execute a closure with the writer connection (tests and maintenance).
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, StorageError>,
    {
        self.pool.with_writer(f)
    }
}

impl ITalentFlowStorage for SqliteTalentFlowStore {
    // ── Writes ──

    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| tables::upsert_snapshot(conn, snapshot))
    }

    fn save_movement(&self, movement: &Movement) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| tables::insert_movement(conn, movement))
    }

    fn save_signal(&self, signal: &Signal) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| tables::insert_signal(conn, signal))
    }

    fn save_governance_state(&self, state: &GovernanceState) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| tables::upsert_governance(conn, state))
    }

    fn save_contradiction(&self, contradiction: &Contradiction) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| tables::insert_contradiction(conn, contradiction))
    }

    fn record_audit_event(&self, event: &AuditEvent) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| tables::insert_audit_event(conn, event))
    }

    fn save_run(&self, summary: &RunSummary) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| tables::upsert_run(conn, summary))
    }

    // ── Reads ──

    fn get_last_snapshot(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_last_snapshot(conn, person_id))
    }

    fn get_snapshot_history(&self, person_id: &str) -> Result<Vec<Snapshot>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_snapshot_history(conn, person_id))
    }

    fn get_governance_state(
        &self,
        person_id: &str,
    ) -> Result<Option<GovernanceState>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_governance(conn, person_id))
    }

    fn get_movements(&self, person_id: &str) -> Result<Vec<Movement>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_movements(conn, person_id))
    }

    fn get_signals(&self, person_id: &str) -> Result<Vec<Signal>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_signals(conn, person_id))
    }

    fn get_contradictions(&self, person_id: &str) -> Result<Vec<Contradiction>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_contradictions(conn, person_id))
    }

    fn get_audit_events(
        &self,
        person_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<AuditEvent>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_audit_events(conn, person_id, limit))
    }

    fn get_recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>, StorageError> {
        self.pool
            .with_reader(|conn| tables::query_recent_runs(conn, limit))
    }

    // ── Lifecycle ──

    fn migrate(&self) -> Result<u32, StorageError> {
        self.pool.with_writer(migrations::migrate)
    }

    fn schema_version(&self) -> Result<u32, StorageError> {
        self.pool.with_reader(migrations::get_schema_version)
    }

    fn apply_retention(
        &self,
        now: DateTime<Utc>,
        audit_retention_days: u32,
        run_retention_days: u32,
    ) -> Result<RetentionReport, StorageError> {
        self.pool.with_writer(|conn| {
            retention::apply_retention(conn, now, audit_retention_days, run_retention_days)
        })
    }

    fn storage_stats(&self) -> Result<TalentFlowStorageStats, StorageError> {
        self.pool.with_reader(tables::count_rows)
    }
}
