//! `CandidateSelector`: which incoming states enter evaluation this run.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use talent_flow_core::config::SelectionConfig;
use talent_flow_core::traits::{AuditSink, ITalentFlowStorage};
use talent_flow_core::types::{AuditEvent, AuditEventType, AuditSeverity, PersonState};
use tracing::{info, warn};

/// Worker id on events recorded before evaluation starts.
const SELECTOR_WORKER: &str = "selector";

#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// One state per person, ordered by `person_id`.
    pub candidates: Vec<PersonState>,
    pub skipped_malformed: u32,
    pub not_active: u32,
    /// Over the per-run cap, left for the next run.
    pub deferred: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CandidateSelector {
    active_window: Duration,
    max_candidates: usize,
}

impl CandidateSelector {
    pub fn from_config(config: &SelectionConfig) -> Self {
        Self {
            active_window: Duration::days(i64::from(config.effective_active_window_days())),
            max_candidates: config.effective_max_candidates(),
        }
    }

    pub fn select(
        &self,
        states: Vec<PersonState>,
        store: &dyn ITalentFlowStorage,
        audit: &dyn AuditSink,
        now: DateTime<Utc>,
    ) -> Selection {
        let mut selection = Selection::default();

        // Latest observation per person; BTreeMap keeps the output order stable.
        let mut latest: BTreeMap<String, PersonState> = BTreeMap::new();
        for state in states {
            let person_id = state.person_id.trim().to_string();
            if person_id.is_empty() {
                warn!(observed_at = %state.observed_at, "skipping record without person_id");
                audit.record(
                    &AuditEvent::with_severity(
                        SELECTOR_WORKER,
                        "",
                        AuditEventType::InputMalformed,
                        json!({ "reason": "missing person_id" }),
                        AuditSeverity::Warning,
                    )
                    .at(now),
                );
                selection.skipped_malformed += 1;
                continue;
            }
            match latest.get(&person_id) {
                Some(existing) if existing.observed_at >= state.observed_at => {}
                _ => {
                    let mut state = state;
                    state.person_id = person_id.clone();
                    latest.insert(person_id, state);
                }
            }
        }

        let cutoff = now - self.active_window;
        for (person_id, state) in latest {
            let recent = state.observed_at >= cutoff;
            let active = recent || self.never_snapshotted(store, &person_id);
            if !active {
                audit.record(
                    &AuditEvent::info(
                        SELECTOR_WORKER,
                        &person_id,
                        AuditEventType::NotActive,
                        json!({ "observed_at": state.observed_at }),
                    )
                    .at(now),
                );
                selection.not_active += 1;
                continue;
            }
            if selection.candidates.len() >= self.max_candidates {
                audit.record(
                    &AuditEvent::info(
                        SELECTOR_WORKER,
                        &person_id,
                        AuditEventType::Deferred,
                        json!({ "max_candidates_per_run": self.max_candidates }),
                    )
                    .at(now),
                );
                selection.deferred.push(person_id);
                continue;
            }
            selection.candidates.push(state);
        }

        if !selection.deferred.is_empty() {
            info!(
                max = self.max_candidates,
                deferred = selection.deferred.len(),
                "Capping run, excess deferred to next run"
            );
        }
        selection
    }

    /// Lookup failures count as "never snapshotted": evaluating an extra
    /// person is harmless, the hash guard makes it a no-op.
    fn never_snapshotted(&self, store: &dyn ITalentFlowStorage, person_id: &str) -> bool {
        match store.get_last_snapshot(person_id) {
            Ok(snapshot) => snapshot.is_none(),
            Err(e) => {
                warn!(person_id, error = %e, "snapshot lookup failed during selection");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use talent_flow_core::traits::NoopAuditSink;
    use talent_flow_core::types::Snapshot;

    use super::*;
    use crate::storage::SqliteTalentFlowStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap()
    }

    fn state(id: &str, days_ago: i64) -> PersonState {
        PersonState::new(id, now() - Duration::days(days_ago))
    }

    fn selector(max: usize) -> CandidateSelector {
        CandidateSelector::from_config(&SelectionConfig {
            active_window_days: Some(30),
            max_candidates_per_run: Some(max),
        })
    }

    #[test]
    fn test_malformed_and_dedupe() {
        let store = SqliteTalentFlowStore::open_in_memory().unwrap();
        let sel = selector(100).select(
            vec![state("", 1), state("p1", 5), state("p1", 2), state(" p2 ", 1)],
            &store,
            &NoopAuditSink,
            now(),
        );
        assert_eq!(sel.skipped_malformed, 1);
        let ids: Vec<&str> = sel.candidates.iter().map(|s| s.person_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(sel.candidates[0].observed_at, now() - Duration::days(2));
    }

    #[test]
    fn test_stale_person_kept_only_without_snapshot() {
        let store = SqliteTalentFlowStore::open_in_memory().unwrap();
        let stale = state("p1", 90);
        let sel = selector(100).select(vec![stale.clone()], &store, &NoopAuditSink, now());
        assert_eq!(sel.candidates.len(), 1);

        store
            .save_snapshot(&Snapshot {
                person_id: "p1".into(),
                state: stale.clone(),
                fingerprint: "fp".into(),
                snapshot_date: now().date_naive(),
                created_at: now(),
            })
            .unwrap();
        let sel = selector(100).select(vec![stale], &store, &NoopAuditSink, now());
        assert!(sel.candidates.is_empty());
        assert_eq!(sel.not_active, 1);
    }

    #[test]
    fn test_cap_defers_excess() {
        let store = SqliteTalentFlowStore::open_in_memory().unwrap();
        let sel = selector(2).select(
            vec![state("a", 1), state("b", 1), state("c", 1)],
            &store,
            &NoopAuditSink,
            now(),
        );
        assert_eq!(sel.candidates.len(), 2);
        assert_eq!(sel.deferred, vec!["c".to_string()]);
    }
}
