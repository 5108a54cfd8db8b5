//! RunSummary: operator-facing counts for one batch run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::movement::MovementType;

/// Counts sufficient to audit a run without inspecting individual records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Candidates that entered evaluation.
    pub processed: u32,
    /// Fingerprint matched the last snapshot.
    pub unchanged: u32,
    /// First observation of a person; snapshot stored, nothing classified.
    pub baselined: u32,
    /// Filtered out by the candidate selector.
    pub not_active: u32,
    /// Dropped for missing identifying fields.
    pub skipped_malformed: u32,
    /// Over the per-run candidate cap, left for the next run.
    pub deferred: u32,
    pub movements_detected: BTreeMap<MovementType, u32>,
    pub signals_emitted: u32,
    pub snapshots_saved: u32,
    pub contradictions_detected: u32,
    pub suppressed_cooldown: u32,
    pub suppressed_rate_cap: u32,
    pub below_threshold: u32,
    pub persistence_failures: u32,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn new(run_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at,
            finished_at: None,
            processed: 0,
            unchanged: 0,
            baselined: 0,
            not_active: 0,
            skipped_malformed: 0,
            deferred: 0,
            movements_detected: BTreeMap::new(),
            signals_emitted: 0,
            snapshots_saved: 0,
            contradictions_detected: 0,
            suppressed_cooldown: 0,
            suppressed_rate_cap: 0,
            below_threshold: 0,
            persistence_failures: 0,
            cancelled: false,
        }
    }

    pub fn record_movement(&mut self, movement_type: MovementType) {
        *self.movements_detected.entry(movement_type).or_insert(0) += 1;
    }

    pub fn total_movements(&self) -> u32 {
        self.movements_detected.values().sum()
    }

    pub fn movements_of(&self, movement_type: MovementType) -> u32 {
        self.movements_detected.get(&movement_type).copied().unwrap_or(0)
    }

    /// Fold a partial (per-worker) summary into this one.
    pub fn merge(&mut self, other: &RunSummary) {
        self.processed += other.processed;
        self.unchanged += other.unchanged;
        self.baselined += other.baselined;
        self.not_active += other.not_active;
        self.skipped_malformed += other.skipped_malformed;
        self.deferred += other.deferred;
        for (t, n) in &other.movements_detected {
            *self.movements_detected.entry(*t).or_insert(0) += n;
        }
        self.signals_emitted += other.signals_emitted;
        self.snapshots_saved += other.snapshots_saved;
        self.contradictions_detected += other.contradictions_detected;
        self.suppressed_cooldown += other.suppressed_cooldown;
        self.suppressed_rate_cap += other.suppressed_rate_cap;
        self.below_threshold += other.below_threshold;
        self.persistence_failures += other.persistence_failures;
        self.cancelled |= other.cancelled;
    }
}
