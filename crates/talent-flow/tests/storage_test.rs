//! SqliteTalentFlowStore against a real file.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use talent_flow::diff::Fingerprinter;
use talent_flow::storage::SqliteTalentFlowStore;
use talent_flow_core::config::{FingerprintConfig, StorageConfig};
use talent_flow_core::traits::ITalentFlowStorage;
use talent_flow_core::types::{
    AuditEvent, AuditEventType, Contradiction, ContradictionKind, DataSource, GovernanceState,
    Movement, MovementType, PersonState, RunSummary, Severity, Snapshot,
};

fn open(dir: &tempfile::TempDir) -> SqliteTalentFlowStore {
    SqliteTalentFlowStore::open(&dir.path().join("nested/talent_flow.db"), &StorageConfig::default())
        .unwrap()
}

fn snapshot(person_id: &str, title: &str, date: NaiveDate) -> Snapshot {
    let created_at = Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap());
    let mut state = PersonState::new(person_id, created_at);
    state.title = Some(title.to_string());
    state.company_name = Some("Acme".to_string());
    Snapshot {
        person_id: person_id.to_string(),
        fingerprint: Fingerprinter::new(&FingerprintConfig::default()).fingerprint(&state),
        state,
        snapshot_date: date,
        created_at,
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

#[test]
fn file_store_creates_parent_dirs_and_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    assert!(dir.path().join("nested/talent_flow.db").exists());
    assert!(store.is_wal_mode());
    assert_eq!(store.schema_version().unwrap(), store.migrate().unwrap());
}

#[test]
fn snapshots_keep_history_and_replace_same_day() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);

    store.save_snapshot(&snapshot("p1", "Engineer", date(1))).unwrap();
    store.save_snapshot(&snapshot("p1", "Senior Engineer", date(2))).unwrap();
    store.save_snapshot(&snapshot("p1", "Staff Engineer", date(2))).unwrap();

    let history = store.get_snapshot_history("p1").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].state.title.as_deref(), Some("Engineer"));

    let last = store.get_last_snapshot("p1").unwrap().unwrap();
    assert_eq!(last.snapshot_date, date(2));
    assert_eq!(last.state.title.as_deref(), Some("Staff Engineer"));
    assert!(store.get_last_snapshot("nobody").unwrap().is_none());
}

#[test]
fn reopened_store_sees_committed_rows() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(&dir);
        store.save_snapshot(&snapshot("p1", "Engineer", date(1))).unwrap();
        let mut gov = GovernanceState::new("p1");
        gov.record_movement(Utc::now(), "2026-04");
        store.save_governance_state(&gov).unwrap();
    }
    let store = open(&dir);
    assert!(store.get_last_snapshot("p1").unwrap().is_some());
    let gov = store.get_governance_state("p1").unwrap().unwrap();
    assert_eq!(gov.movements_in("2026-04"), 1);
}

#[test]
fn movement_insert_is_idempotent_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    let snap = snapshot("p1", "Engineer", date(1));
    let movement = Movement {
        movement_id: "mv_1".into(),
        person_id: "p1".into(),
        movement_type: MovementType::Promotion,
        confidence: 0.8,
        old_state: snap.state.clone(),
        new_state: snap.state.clone(),
        data_source: DataSource::Apollo,
        metadata: serde_json::json!({ "matched_rules": ["title_level_increased"] }),
        detected_at: snap.created_at,
    };
    store.save_movement(&movement).unwrap();
    store.save_movement(&movement).unwrap();

    let stored = store.get_movements("p1").unwrap();
    assert_eq!(stored, vec![movement]);
}

#[test]
fn contradictions_round_trip_with_severity() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    let snap = snapshot("p1", "Engineer", date(1));
    let contradiction = Contradiction {
        contradiction_id: "c1".into(),
        person_id: "p1".into(),
        contradiction_type: ContradictionKind::EndDateCleared,
        severity: Severity::Medium,
        old_state: snap.state.clone(),
        new_state: snap.state,
        detail: "end_date 2026-03-31 cleared at the same company".into(),
        resolved: false,
        detected_at: snap.created_at,
    };
    store.save_contradiction(&contradiction).unwrap();
    assert_eq!(store.get_contradictions("p1").unwrap(), vec![contradiction]);
}

#[test]
fn retention_prunes_only_operational_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();

    let old_event = AuditEvent::info("w", "p1", AuditEventType::HashUnchanged, serde_json::json!({}))
        .at(now - Duration::days(200));
    let new_event = AuditEvent::info("w", "p1", AuditEventType::BaselineSnapshot, serde_json::json!({}))
        .at(now - Duration::days(1));
    store.record_audit_event(&old_event).unwrap();
    store.record_audit_event(&new_event).unwrap();
    store.save_run(&RunSummary::new("old-run", now - Duration::days(400))).unwrap();
    store.save_run(&RunSummary::new("new-run", now - Duration::days(2))).unwrap();
    store.save_snapshot(&snapshot("p1", "Engineer", date(1))).unwrap();

    let report = store.apply_retention(now, 180, 365).unwrap();
    assert_eq!(report.audit_events_deleted, 1);
    assert_eq!(report.runs_deleted, 1);

    let events = store.get_audit_events(Some("p1"), 10).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, AuditEventType::BaselineSnapshot);
    let runs = store.get_recent_runs(10).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, "new-run");
    assert_eq!(store.storage_stats().unwrap().snapshot_count, 1);
}
