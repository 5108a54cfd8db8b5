//! `ITalentFlowStorage` trait: the persistence boundary of the engine.
//!
//! Writes take domain records; reads return them. How rows are laid out is
//! the implementation's business. The engine only relies on the write
//! order it issues (movement, signal, snapshot, governance) being durable
//! per call.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::StorageError;
use crate::types::{
    AuditEvent, Contradiction, GovernanceState, Movement, RunSummary, Signal, Snapshot,
};

/// Row counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalentFlowStorageStats {
    pub snapshot_count: u64,
    pub movement_count: u64,
    pub signal_count: u64,
    pub contradiction_count: u64,
    pub governance_count: u64,
    pub audit_count: u64,
    pub run_count: u64,
}

/// Rows removed by a retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub audit_events_deleted: u64,
    pub runs_deleted: u64,
}

// ── ITalentFlowStorage trait ──

pub trait ITalentFlowStorage: Send + Sync {
    // ── Writes ──

    /// Insert or replace the snapshot for `(person_id, snapshot_date)`.
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError>;

    /// Append a movement. Movements are never updated.
    fn save_movement(&self, movement: &Movement) -> Result<(), StorageError>;

    fn save_signal(&self, signal: &Signal) -> Result<(), StorageError>;

    /// Upsert governance bookkeeping keyed by person_id.
    fn save_governance_state(&self, state: &GovernanceState) -> Result<(), StorageError>;

    fn save_contradiction(&self, contradiction: &Contradiction) -> Result<(), StorageError>;

    fn record_audit_event(&self, event: &AuditEvent) -> Result<(), StorageError>;

    fn save_run(&self, summary: &RunSummary) -> Result<(), StorageError>;

    // ── Reads ──

    /// Latest snapshot for a person, by snapshot_date then created_at.
    fn get_last_snapshot(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError>;

    /// Every snapshot for a person, oldest first.
    fn get_snapshot_history(&self, person_id: &str) -> Result<Vec<Snapshot>, StorageError>;

    fn get_governance_state(
        &self,
        person_id: &str,
    ) -> Result<Option<GovernanceState>, StorageError>;

    /// Movements for a person, oldest first.
    fn get_movements(&self, person_id: &str) -> Result<Vec<Movement>, StorageError>;

    fn get_signals(&self, person_id: &str) -> Result<Vec<Signal>, StorageError>;

    fn get_contradictions(&self, person_id: &str) -> Result<Vec<Contradiction>, StorageError>;

    /// Audit events, newest first. `None` = every person.
    fn get_audit_events(
        &self,
        person_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<AuditEvent>, StorageError>;

    /// Recent runs, newest first.
    fn get_recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>, StorageError>;

    // ── Lifecycle ──

    /// Create or upgrade the schema. Idempotent. Returns the resulting version.
    fn migrate(&self) -> Result<u32, StorageError>;

    fn schema_version(&self) -> Result<u32, StorageError>;

    /// Delete audit events and run history older than the retention windows.
    fn apply_retention(
        &self,
        now: DateTime<Utc>,
        audit_retention_days: u32,
        run_retention_days: u32,
    ) -> Result<RetentionReport, StorageError>;

    fn storage_stats(&self) -> Result<TalentFlowStorageStats, StorageError>;
}

// ── Arc<T> blanket impl ──

impl<T: ITalentFlowStorage + ?Sized> ITalentFlowStorage for Arc<T> {
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        (**self).save_snapshot(snapshot)
    }
    fn save_movement(&self, movement: &Movement) -> Result<(), StorageError> {
        (**self).save_movement(movement)
    }
    fn save_signal(&self, signal: &Signal) -> Result<(), StorageError> {
        (**self).save_signal(signal)
    }
    fn save_governance_state(&self, state: &GovernanceState) -> Result<(), StorageError> {
        (**self).save_governance_state(state)
    }
    fn save_contradiction(&self, contradiction: &Contradiction) -> Result<(), StorageError> {
        (**self).save_contradiction(contradiction)
    }
    fn record_audit_event(&self, event: &AuditEvent) -> Result<(), StorageError> {
        (**self).record_audit_event(event)
    }
    fn save_run(&self, summary: &RunSummary) -> Result<(), StorageError> {
        (**self).save_run(summary)
    }
    fn get_last_snapshot(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError> {
        (**self).get_last_snapshot(person_id)
    }
    fn get_snapshot_history(&self, person_id: &str) -> Result<Vec<Snapshot>, StorageError> {
        (**self).get_snapshot_history(person_id)
    }
    fn get_governance_state(
        &self,
        person_id: &str,
    ) -> Result<Option<GovernanceState>, StorageError> {
        (**self).get_governance_state(person_id)
    }
    fn get_movements(&self, person_id: &str) -> Result<Vec<Movement>, StorageError> {
        (**self).get_movements(person_id)
    }
    fn get_signals(&self, person_id: &str) -> Result<Vec<Signal>, StorageError> {
        (**self).get_signals(person_id)
    }
    fn get_contradictions(&self, person_id: &str) -> Result<Vec<Contradiction>, StorageError> {
        (**self).get_contradictions(person_id)
    }
    fn get_audit_events(
        &self,
        person_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<AuditEvent>, StorageError> {
        (**self).get_audit_events(person_id, limit)
    }
    fn get_recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>, StorageError> {
        (**self).get_recent_runs(limit)
    }
    fn migrate(&self) -> Result<u32, StorageError> {
        (**self).migrate()
    }
    fn schema_version(&self) -> Result<u32, StorageError> {
        (**self).schema_version()
    }
    fn apply_retention(
        &self,
        now: DateTime<Utc>,
        audit_retention_days: u32,
        run_retention_days: u32,
    ) -> Result<RetentionReport, StorageError> {
        (**self).apply_retention(now, audit_retention_days, run_retention_days)
    }
    fn storage_stats(&self) -> Result<TalentFlowStorageStats, StorageError> {
        (**self).storage_stats()
    }
}
