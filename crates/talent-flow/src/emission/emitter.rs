//! `SignalEmitter`: the only writer of movements, signals, and governance.
//!
//! A commit writes, per movement, the movement then its signal; then the
//! snapshot; then the governance state. Every write is retried on transient
//! failure. A failure stops the commit, so governance never advances past a
//! movement that was not durably written.

use std::collections::BTreeMap;
use std::sync::Arc;

use talent_flow_core::config::{RetryConfig, TalentFlowConfig};
use talent_flow_core::errors::{EvaluationError, StorageError};
use talent_flow_core::traits::ITalentFlowStorage;
use talent_flow_core::types::{
    Contradiction, GovernanceState, Movement, MovementType, Signal, Snapshot,
};

use super::retry::with_retry;
use super::signal::derive_signal;

/// Everything one person's evaluation wants written.
#[derive(Debug, Clone)]
pub struct CommitPlan {
    pub person_id: String,
    pub movements: Vec<Movement>,
    pub snapshot: Snapshot,
    /// Present only when movements were admitted.
    pub governance: Option<GovernanceState>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    pub movements: Vec<Movement>,
    pub signals: Vec<Signal>,
    pub snapshot_saved: bool,
    pub governance_saved: bool,
}

pub struct SignalEmitter {
    store: Arc<dyn ITalentFlowStorage>,
    retry: RetryConfig,
    base_weights: BTreeMap<MovementType, u32>,
}

impl SignalEmitter {
    pub fn new(store: Arc<dyn ITalentFlowStorage>, config: &TalentFlowConfig) -> Self {
        let base_weights = MovementType::ALL
            .iter()
            .map(|&t| (t, config.effective_movement(t).effective_signal_base_weight()))
            .collect();
        Self {
            store,
            retry: config.storage.retry.clone(),
            base_weights,
        }
    }

    pub fn base_weight(&self, movement_type: MovementType) -> u32 {
        self.base_weights.get(&movement_type).copied().unwrap_or(0)
    }

    /// Pure: the signal a movement would produce.
    pub fn emit(&self, movement: &Movement) -> Signal {
        derive_signal(movement, self.base_weight(movement.movement_type))
    }

    fn write(
        &self,
        person_id: &str,
        stage: &'static str,
        op: impl FnMut() -> Result<(), StorageError>,
    ) -> Result<(), EvaluationError> {
        with_retry(stage, &self.retry, op).map_err(|source| EvaluationError::PersistenceFailed {
            person_id: person_id.to_string(),
            stage,
            source,
        })
    }

    /// Write the plan in order: Movement -> Signal (per movement), Snapshot,
    /// Governance.
    pub fn commit(&self, plan: CommitPlan) -> Result<CommitReport, EvaluationError> {
        let person_id = plan.person_id.as_str();
        let mut report = CommitReport::default();

        for movement in &plan.movements {
            self.write(person_id, "movement", || self.store.save_movement(movement))?;
            let signal = self.emit(movement);
            self.write(person_id, "signal", || self.store.save_signal(&signal))?;
            report.signals.push(signal);
        }

        self.write(person_id, "snapshot", || self.store.save_snapshot(&plan.snapshot))?;
        report.snapshot_saved = true;

        if let Some(governance) = &plan.governance {
            self.write(person_id, "governance", || {
                self.store.save_governance_state(governance)
            })?;
            report.governance_saved = true;
        }

        report.movements = plan.movements;
        Ok(report)
    }

    /// Snapshot-only write for baselines, suppressed, and no-movement paths.
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), EvaluationError> {
        self.write(&snapshot.person_id, "snapshot", || {
            self.store.save_snapshot(snapshot)
        })
    }

    /// Advisory record; callers log failures and carry on.
    pub fn save_contradiction(&self, contradiction: &Contradiction) -> Result<(), EvaluationError> {
        self.write(&contradiction.person_id, "contradiction", || {
            self.store.save_contradiction(contradiction)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use talent_flow_core::types::{DataSource, PersonState};

    use super::*;
    use crate::storage::SqliteTalentFlowStore;

    fn plan(store_person: &str, movements: usize) -> CommitPlan {
        let now = Utc::now();
        let state = PersonState::new(store_person, now);
        let movements = (0..movements)
            .map(|i| Movement {
                movement_id: format!("mv-{i}"),
                person_id: store_person.into(),
                movement_type: MovementType::Hire,
                confidence: 0.9,
                old_state: state.clone(),
                new_state: state.clone(),
                data_source: DataSource::LinkedIn,
                metadata: serde_json::json!({}),
                detected_at: now,
            })
            .collect();
        let mut governance = GovernanceState::new(store_person);
        governance.record_movement(now, "2026-06");
        CommitPlan {
            person_id: store_person.into(),
            movements,
            snapshot: Snapshot {
                person_id: store_person.into(),
                state,
                fingerprint: "fp".into(),
                snapshot_date: now.date_naive(),
                created_at: now,
            },
            governance: Some(governance),
        }
    }

    #[test]
    fn test_commit_writes_all_four() {
        let store = Arc::new(SqliteTalentFlowStore::open_in_memory().unwrap());
        let emitter = SignalEmitter::new(store.clone(), &TalentFlowConfig::default());
        let report = emitter.commit(plan("p1", 1)).unwrap();
        assert_eq!(report.signals.len(), 1);
        assert_eq!(report.signals[0].signal_weight, 27);
        assert!(report.snapshot_saved && report.governance_saved);

        assert_eq!(store.get_movements("p1").unwrap().len(), 1);
        assert_eq!(store.get_signals("p1").unwrap().len(), 1);
        assert!(store.get_last_snapshot("p1").unwrap().is_some());
        assert_eq!(
            store.get_governance_state("p1").unwrap().unwrap().movements_this_period,
            1
        );
    }

    #[test]
    fn test_recommit_same_movement_is_idempotent() {
        let store = Arc::new(SqliteTalentFlowStore::open_in_memory().unwrap());
        let emitter = SignalEmitter::new(store.clone(), &TalentFlowConfig::default());
        emitter.commit(plan("p1", 1)).unwrap();
        emitter.commit(plan("p1", 1)).unwrap();
        assert_eq!(store.get_movements("p1").unwrap().len(), 1);
        assert_eq!(store.get_signals("p1").unwrap().len(), 1);
    }
}
