//! Data retention.
//!
//! Only operational history is pruned:
//! - talent_flow_audit_log: `storage.audit_retention_days` (default 180)
//! - talent_flow_runs: `storage.run_retention_days` (default 365)
//!
//! Snapshots, movements, signals, and contradictions are never deleted here.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use talent_flow_core::constants::SECONDS_PER_DAY;
use talent_flow_core::errors::StorageError;
use talent_flow_core::traits::RetentionReport;

pub fn apply_retention(
    conn: &Connection,
    now: DateTime<Utc>,
    audit_retention_days: u32,
    run_retention_days: u32,
) -> Result<RetentionReport, StorageError> {
    let now = now.timestamp();

    let audit_events_deleted = conn.execute(
        "DELETE FROM talent_flow_audit_log WHERE recorded_epoch < ?1",
        rusqlite::params![now - i64::from(audit_retention_days) * SECONDS_PER_DAY],
    )?;

    let runs_deleted = conn.execute(
        "DELETE FROM talent_flow_runs WHERE started_epoch < ?1",
        rusqlite::params![now - i64::from(run_retention_days) * SECONDS_PER_DAY],
    )?;

    Ok(RetentionReport {
        audit_events_deleted: audit_events_deleted as u64,
        runs_deleted: runs_deleted as u64,
    })
}
