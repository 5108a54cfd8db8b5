//! Shared helpers for talent-flow integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use talent_flow::audit::RecordingAuditSink;
use talent_flow::storage::SqliteTalentFlowStore;
use talent_flow::TalentFlowRunner;
use talent_flow_core::config::{RetryConfig, TalentFlowConfig};
use talent_flow_core::errors::StorageError;
use talent_flow_core::traits::{ITalentFlowStorage, RetentionReport, TalentFlowStorageStats};
use talent_flow_core::types::{
    AuditEvent, Contradiction, DataSource, GovernanceState, Movement, PersonState, RunSummary,
    Signal, Snapshot,
};

/// 2026-01-05 09:00 UTC plus `n` days.
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap() + Duration::days(n)
}

/// A LinkedIn-sourced state observed one day before `now`.
pub fn state(
    person_id: &str,
    company: Option<&str>,
    title: Option<&str>,
    now: DateTime<Utc>,
) -> PersonState {
    let mut s = PersonState::new(person_id, now - Duration::days(1));
    s.company_name = company.map(str::to_string);
    s.title = title.map(str::to_string);
    s.data_source = DataSource::LinkedIn;
    s
}

pub fn fast_config() -> TalentFlowConfig {
    let mut config = TalentFlowConfig::default();
    config.storage.retry = RetryConfig {
        max_attempts: Some(3),
        initial_backoff_ms: Some(0),
        max_backoff_ms: Some(0),
    };
    config.runner.threads = Some(2);
    config
}

pub struct Harness {
    pub store: Arc<FlakyStore>,
    pub audit: Arc<RecordingAuditSink>,
    pub runner: TalentFlowRunner,
}

pub fn harness(config: TalentFlowConfig) -> Harness {
    let store = Arc::new(FlakyStore::new(SqliteTalentFlowStore::open_in_memory().unwrap()));
    let audit = Arc::new(RecordingAuditSink::new());
    let runner = TalentFlowRunner::new(config, store.clone(), audit.clone());
    Harness {
        store,
        audit,
        runner,
    }
}

/// Storage wrapper that injects failures into selected writes.
pub struct FlakyStore {
    inner: SqliteTalentFlowStore,
    /// People whose signal writes fail with a non-retryable error.
    fail_signals_for: Mutex<HashSet<String>>,
    /// People whose contradiction writes fail.
    fail_contradictions_for: Mutex<HashSet<String>>,
    /// Remaining movement writes that report a busy database.
    busy_movement_writes: AtomicU32,
    pub governance_writes: AtomicU32,
}

impl FlakyStore {
    pub fn new(inner: SqliteTalentFlowStore) -> Self {
        Self {
            inner,
            fail_signals_for: Mutex::new(HashSet::new()),
            fail_contradictions_for: Mutex::new(HashSet::new()),
            busy_movement_writes: AtomicU32::new(0),
            governance_writes: AtomicU32::new(0),
        }
    }

    pub fn fail_signals(&self, person_id: &str) {
        self.fail_signals_for.lock().unwrap().insert(person_id.to_string());
    }

    pub fn fail_contradictions(&self, person_id: &str) {
        self.fail_contradictions_for
            .lock()
            .unwrap()
            .insert(person_id.to_string());
    }

    pub fn heal(&self) {
        self.fail_signals_for.lock().unwrap().clear();
        self.fail_contradictions_for.lock().unwrap().clear();
        self.busy_movement_writes.store(0, Ordering::SeqCst);
    }

    pub fn busy_for(&self, writes: u32) {
        self.busy_movement_writes.store(writes, Ordering::SeqCst);
    }
}

impl ITalentFlowStorage for FlakyStore {
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.inner.save_snapshot(snapshot)
    }
    fn save_movement(&self, movement: &Movement) -> Result<(), StorageError> {
        let busy = self
            .busy_movement_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if busy {
            return Err(StorageError::DbBusy);
        }
        self.inner.save_movement(movement)
    }
    fn save_signal(&self, signal: &Signal) -> Result<(), StorageError> {
        if self.fail_signals_for.lock().unwrap().contains(&signal.person_id) {
            return Err(StorageError::SqliteError {
                message: "disk I/O error".to_string(),
            });
        }
        self.inner.save_signal(signal)
    }
    fn save_governance_state(&self, state: &GovernanceState) -> Result<(), StorageError> {
        self.governance_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save_governance_state(state)
    }
    fn save_contradiction(&self, contradiction: &Contradiction) -> Result<(), StorageError> {
        if self
            .fail_contradictions_for
            .lock()
            .unwrap()
            .contains(&contradiction.person_id)
        {
            return Err(StorageError::SqliteError {
                message: "disk I/O error".to_string(),
            });
        }
        self.inner.save_contradiction(contradiction)
    }
    fn record_audit_event(&self, event: &AuditEvent) -> Result<(), StorageError> {
        self.inner.record_audit_event(event)
    }
    fn save_run(&self, summary: &RunSummary) -> Result<(), StorageError> {
        self.inner.save_run(summary)
    }
    fn get_last_snapshot(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError> {
        self.inner.get_last_snapshot(person_id)
    }
    fn get_snapshot_history(&self, person_id: &str) -> Result<Vec<Snapshot>, StorageError> {
        self.inner.get_snapshot_history(person_id)
    }
    fn get_governance_state(
        &self,
        person_id: &str,
    ) -> Result<Option<GovernanceState>, StorageError> {
        self.inner.get_governance_state(person_id)
    }
    fn get_movements(&self, person_id: &str) -> Result<Vec<Movement>, StorageError> {
        self.inner.get_movements(person_id)
    }
    fn get_signals(&self, person_id: &str) -> Result<Vec<Signal>, StorageError> {
        self.inner.get_signals(person_id)
    }
    fn get_contradictions(&self, person_id: &str) -> Result<Vec<Contradiction>, StorageError> {
        self.inner.get_contradictions(person_id)
    }
    fn get_audit_events(
        &self,
        person_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<AuditEvent>, StorageError> {
        self.inner.get_audit_events(person_id, limit)
    }
    fn get_recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>, StorageError> {
        self.inner.get_recent_runs(limit)
    }
    fn migrate(&self) -> Result<u32, StorageError> {
        self.inner.migrate()
    }
    fn schema_version(&self) -> Result<u32, StorageError> {
        self.inner.schema_version()
    }
    fn apply_retention(
        &self,
        now: DateTime<Utc>,
        audit_retention_days: u32,
        run_retention_days: u32,
    ) -> Result<RetentionReport, StorageError> {
        self.inner
            .apply_retention(now, audit_retention_days, run_retention_days)
    }
    fn storage_stats(&self) -> Result<TalentFlowStorageStats, StorageError> {
        self.inner.storage_stats()
    }
}
