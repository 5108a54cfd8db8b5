//! Schema SQL constants used by migrations.rs.

/// V1 schema: 7 tables + indexes.
///
/// Snapshots keep history: one row per (person_id, snapshot_date).
/// Signals reference their movement, so a signal can never exist without it.
pub const TALENT_FLOW_TABLES_V1: &str = "
    CREATE TABLE IF NOT EXISTS talent_flow_snapshots (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        person_id TEXT NOT NULL,
        snapshot_date TEXT NOT NULL,
        fingerprint TEXT NOT NULL,
        state TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (person_id, snapshot_date)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS talent_flow_movements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        movement_id TEXT NOT NULL UNIQUE,
        person_id TEXT NOT NULL,
        movement_type TEXT NOT NULL,
        confidence REAL NOT NULL,
        old_state TEXT NOT NULL,
        new_state TEXT NOT NULL,
        data_source TEXT NOT NULL,
        metadata TEXT NOT NULL DEFAULT '{}',
        detected_at TEXT NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS talent_flow_signals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        signal_id TEXT NOT NULL UNIQUE,
        person_id TEXT NOT NULL,
        company_id TEXT,
        signal_type TEXT NOT NULL,
        signal_weight INTEGER NOT NULL,
        source_id TEXT NOT NULL REFERENCES talent_flow_movements(movement_id),
        detected_at TEXT NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS talent_flow_contradictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contradiction_id TEXT NOT NULL UNIQUE,
        person_id TEXT NOT NULL,
        contradiction_type TEXT NOT NULL,
        severity TEXT NOT NULL,
        old_state TEXT NOT NULL,
        new_state TEXT NOT NULL,
        detail TEXT NOT NULL DEFAULT '',
        resolved INTEGER NOT NULL DEFAULT 0,
        detected_at TEXT NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS talent_flow_governance (
        person_id TEXT PRIMARY KEY NOT NULL,
        last_movement_at TEXT,
        movements_this_period INTEGER NOT NULL DEFAULT 0,
        period_key TEXT NOT NULL DEFAULT ''
    ) STRICT;

    CREATE TABLE IF NOT EXISTS talent_flow_audit_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        worker_id TEXT NOT NULL,
        person_id TEXT NOT NULL,
        event_type TEXT NOT NULL,
        event_data TEXT NOT NULL DEFAULT '{}',
        severity TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        recorded_epoch INTEGER NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS talent_flow_runs (
        run_id TEXT PRIMARY KEY NOT NULL,
        started_at TEXT NOT NULL,
        started_epoch INTEGER NOT NULL,
        finished_at TEXT,
        summary TEXT NOT NULL
    ) STRICT;

    CREATE INDEX IF NOT EXISTS idx_snapshots_person ON talent_flow_snapshots(person_id, snapshot_date);
    CREATE INDEX IF NOT EXISTS idx_movements_person ON talent_flow_movements(person_id);
    CREATE INDEX IF NOT EXISTS idx_signals_person ON talent_flow_signals(person_id);
    CREATE INDEX IF NOT EXISTS idx_contradictions_person ON talent_flow_contradictions(person_id);
    CREATE INDEX IF NOT EXISTS idx_audit_person ON talent_flow_audit_log(person_id);
    CREATE INDEX IF NOT EXISTS idx_audit_epoch ON talent_flow_audit_log(recorded_epoch);
    CREATE INDEX IF NOT EXISTS idx_runs_epoch ON talent_flow_runs(started_epoch);
";

/// All 7 table names.
pub const TALENT_FLOW_TABLE_NAMES: [&str; 7] = [
    "talent_flow_snapshots",
    "talent_flow_movements",
    "talent_flow_signals",
    "talent_flow_contradictions",
    "talent_flow_governance",
    "talent_flow_audit_log",
    "talent_flow_runs",
];
