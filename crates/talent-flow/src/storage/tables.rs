//! Row-level reads and writes for the talent_flow_* tables.
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision;
//! tables subject to retention also carry an integer epoch column.
//! Person states and free-form metadata are stored as JSON text.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use talent_flow_core::errors::StorageError;
use talent_flow_core::traits::TalentFlowStorageStats;
use talent_flow_core::types::{
    AuditEvent, AuditEventType, AuditSeverity, Contradiction, ContradictionKind, DataSource,
    GovernanceState, Movement, MovementType, PersonState, RunSummary, Severity, Signal, Snapshot,
};

use super::schema::TALENT_FLOW_TABLE_NAMES;

pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(table: &'static str, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRow {
            table,
            message: format!("bad timestamp '{raw}': {e}"),
        })
}

fn parse_json<T: serde::de::DeserializeOwned>(
    table: &'static str,
    raw: &str,
) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::CorruptRow {
        table,
        message: e.to_string(),
    })
}

fn corrupt(table: &'static str, message: String) -> StorageError {
    StorageError::CorruptRow { table, message }
}

// ── Snapshots ──

/// Insert the snapshot, replacing any existing one for the same day.
pub fn upsert_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<(), StorageError> {
    let state_json = serde_json::to_string(&snapshot.state)?;
    conn.execute(
        "INSERT INTO talent_flow_snapshots (person_id, snapshot_date, fingerprint, state, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (person_id, snapshot_date) DO UPDATE SET
            fingerprint = excluded.fingerprint,
            state = excluded.state,
            created_at = excluded.created_at",
        params![
            snapshot.person_id,
            snapshot.snapshot_date.format("%Y-%m-%d").to_string(),
            snapshot.fingerprint,
            state_json,
            format_ts(&snapshot.created_at),
        ],
    )?;
    Ok(())
}

type SnapshotRow = (String, String, String, String, String);

fn decode_snapshot(row: SnapshotRow) -> Result<Snapshot, StorageError> {
    let (person_id, date, fingerprint, state, created_at) = row;
    let snapshot_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| corrupt("talent_flow_snapshots", format!("bad date '{date}': {e}")))?;
    Ok(Snapshot {
        person_id,
        state: parse_json::<PersonState>("talent_flow_snapshots", &state)?,
        fingerprint,
        snapshot_date,
        created_at: parse_ts("talent_flow_snapshots", &created_at)?,
    })
}

const SNAPSHOT_COLUMNS: &str = "person_id, snapshot_date, fingerprint, state, created_at";

pub fn query_last_snapshot(
    conn: &Connection,
    person_id: &str,
) -> Result<Option<Snapshot>, StorageError> {
    let row: Option<SnapshotRow> = conn
        .query_row(
            &format!(
                "SELECT {SNAPSHOT_COLUMNS} FROM talent_flow_snapshots
                 WHERE person_id = ?1
                 ORDER BY snapshot_date DESC, id DESC LIMIT 1"
            ),
            params![person_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )
        .optional()?;
    row.map(decode_snapshot).transpose()
}

pub fn query_snapshot_history(
    conn: &Connection,
    person_id: &str,
) -> Result<Vec<Snapshot>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SNAPSHOT_COLUMNS} FROM talent_flow_snapshots
         WHERE person_id = ?1 ORDER BY snapshot_date ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![person_id], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode_snapshot(row?)?);
    }
    Ok(out)
}

// ── Movements ──

/// Append a movement. Re-inserting the same `movement_id` is a no-op, so a
/// commit retried after a partial failure does not duplicate it.
pub fn insert_movement(conn: &Connection, movement: &Movement) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO talent_flow_movements
            (movement_id, person_id, movement_type, confidence, old_state, new_state,
             data_source, metadata, detected_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (movement_id) DO NOTHING",
        params![
            movement.movement_id,
            movement.person_id,
            movement.movement_type.as_str(),
            movement.confidence,
            serde_json::to_string(&movement.old_state)?,
            serde_json::to_string(&movement.new_state)?,
            movement.data_source.as_str(),
            serde_json::to_string(&movement.metadata)?,
            format_ts(&movement.detected_at),
        ],
    )?;
    Ok(())
}

pub fn query_movements(conn: &Connection, person_id: &str) -> Result<Vec<Movement>, StorageError> {
    const T: &str = "talent_flow_movements";
    let mut stmt = conn.prepare(
        "SELECT movement_id, person_id, movement_type, confidence, old_state, new_state,
                data_source, metadata, detected_at
         FROM talent_flow_movements WHERE person_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![person_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (movement_id, person_id, movement_type, confidence, old, new, source, meta, at) = row?;
        let movement_type = MovementType::parse(&movement_type)
            .ok_or_else(|| corrupt(T, format!("unknown movement type '{movement_type}'")))?;
        out.push(Movement {
            movement_id,
            person_id,
            movement_type,
            confidence,
            old_state: parse_json(T, &old)?,
            new_state: parse_json(T, &new)?,
            data_source: DataSource::from(source),
            metadata: parse_json(T, &meta)?,
            detected_at: parse_ts(T, &at)?,
        });
    }
    Ok(out)
}

// ── Signals ──

pub fn insert_signal(conn: &Connection, signal: &Signal) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO talent_flow_signals
            (signal_id, person_id, company_id, signal_type, signal_weight, source_id, detected_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (signal_id) DO NOTHING",
        params![
            signal.signal_id,
            signal.person_id,
            signal.company_id,
            signal.signal_type,
            signal.signal_weight,
            signal.source_id,
            format_ts(&signal.detected_at),
        ],
    )?;
    Ok(())
}

pub fn query_signals(conn: &Connection, person_id: &str) -> Result<Vec<Signal>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT signal_id, person_id, company_id, signal_type, signal_weight, source_id, detected_at
         FROM talent_flow_signals WHERE person_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![person_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (signal_id, person_id, company_id, signal_type, signal_weight, source_id, at) = row?;
        out.push(Signal {
            signal_id,
            person_id,
            company_id,
            signal_type,
            signal_weight,
            source_id,
            detected_at: parse_ts("talent_flow_signals", &at)?,
        });
    }
    Ok(out)
}

// ── Contradictions ──

pub fn insert_contradiction(
    conn: &Connection,
    contradiction: &Contradiction,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO talent_flow_contradictions
            (contradiction_id, person_id, contradiction_type, severity, old_state, new_state,
             detail, resolved, detected_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (contradiction_id) DO NOTHING",
        params![
            contradiction.contradiction_id,
            contradiction.person_id,
            contradiction.contradiction_type.as_str(),
            contradiction.severity.as_str(),
            serde_json::to_string(&contradiction.old_state)?,
            serde_json::to_string(&contradiction.new_state)?,
            contradiction.detail,
            contradiction.resolved,
            format_ts(&contradiction.detected_at),
        ],
    )?;
    Ok(())
}

pub fn query_contradictions(
    conn: &Connection,
    person_id: &str,
) -> Result<Vec<Contradiction>, StorageError> {
    const T: &str = "talent_flow_contradictions";
    let mut stmt = conn.prepare(
        "SELECT contradiction_id, person_id, contradiction_type, severity, old_state, new_state,
                detail, resolved, detected_at
         FROM talent_flow_contradictions WHERE person_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![person_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, bool>(7)?,
            row.get::<_, String>(8)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (contradiction_id, person_id, kind, severity, old, new, detail, resolved, at) = row?;
        out.push(Contradiction {
            contradiction_id,
            person_id,
            contradiction_type: ContradictionKind::parse(&kind)
                .ok_or_else(|| corrupt(T, format!("unknown contradiction type '{kind}'")))?,
            severity: Severity::parse(&severity)
                .ok_or_else(|| corrupt(T, format!("unknown severity '{severity}'")))?,
            old_state: parse_json(T, &old)?,
            new_state: parse_json(T, &new)?,
            detail,
            resolved,
            detected_at: parse_ts(T, &at)?,
        });
    }
    Ok(out)
}

// ── Governance ──

pub fn upsert_governance(conn: &Connection, state: &GovernanceState) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO talent_flow_governance (person_id, last_movement_at, movements_this_period, period_key)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (person_id) DO UPDATE SET
            last_movement_at = excluded.last_movement_at,
            movements_this_period = excluded.movements_this_period,
            period_key = excluded.period_key",
        params![
            state.person_id,
            state.last_movement_at.as_ref().map(format_ts),
            state.movements_this_period,
            state.period_key,
        ],
    )?;
    Ok(())
}

pub fn query_governance(
    conn: &Connection,
    person_id: &str,
) -> Result<Option<GovernanceState>, StorageError> {
    let row = conn
        .query_row(
            "SELECT person_id, last_movement_at, movements_this_period, period_key
             FROM talent_flow_governance WHERE person_id = ?1",
            params![person_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;
    row.map(|(person_id, last, count, period_key)| {
        Ok(GovernanceState {
            person_id,
            last_movement_at: last
                .as_deref()
                .map(|raw| parse_ts("talent_flow_governance", raw))
                .transpose()?,
            movements_this_period: count,
            period_key,
        })
    })
    .transpose()
}

// ── Audit log ──

pub fn insert_audit_event(conn: &Connection, event: &AuditEvent) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO talent_flow_audit_log
            (worker_id, person_id, event_type, event_data, severity, recorded_at, recorded_epoch)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.worker_id,
            event.person_id,
            event.event_type.as_str(),
            serde_json::to_string(&event.event_data)?,
            event.severity.as_str(),
            format_ts(&event.recorded_at),
            event.recorded_at.timestamp(),
        ],
    )?;
    Ok(())
}

pub fn query_audit_events(
    conn: &Connection,
    person_id: Option<&str>,
    limit: usize,
) -> Result<Vec<AuditEvent>, StorageError> {
    const T: &str = "talent_flow_audit_log";
    let mut stmt = conn.prepare(
        "SELECT worker_id, person_id, event_type, event_data, severity, recorded_at
         FROM talent_flow_audit_log
         WHERE (?1 IS NULL OR person_id = ?1)
         ORDER BY id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![person_id, limit as i64], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (worker_id, person_id, event_type, data, severity, at) = row?;
        out.push(AuditEvent {
            worker_id,
            person_id,
            event_type: AuditEventType::parse(&event_type)
                .ok_or_else(|| corrupt(T, format!("unknown event type '{event_type}'")))?,
            event_data: parse_json(T, &data)?,
            severity: AuditSeverity::parse(&severity)
                .ok_or_else(|| corrupt(T, format!("unknown severity '{severity}'")))?,
            recorded_at: parse_ts(T, &at)?,
        });
    }
    Ok(out)
}

// ── Runs ──

pub fn upsert_run(conn: &Connection, summary: &RunSummary) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO talent_flow_runs (run_id, started_at, started_epoch, finished_at, summary)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (run_id) DO UPDATE SET
            finished_at = excluded.finished_at,
            summary = excluded.summary",
        params![
            summary.run_id,
            format_ts(&summary.started_at),
            summary.started_at.timestamp(),
            summary.finished_at.as_ref().map(format_ts),
            serde_json::to_string(summary)?,
        ],
    )?;
    Ok(())
}

pub fn query_recent_runs(conn: &Connection, limit: usize) -> Result<Vec<RunSummary>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT summary FROM talent_flow_runs ORDER BY started_epoch DESC, rowid DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(parse_json("talent_flow_runs", &row?)?);
    }
    Ok(out)
}

// ── Stats ──

pub fn count_rows(conn: &Connection) -> Result<TalentFlowStorageStats, StorageError> {
    let mut counts = [0u64; TALENT_FLOW_TABLE_NAMES.len()];
    for (slot, table) in counts.iter_mut().zip(TALENT_FLOW_TABLE_NAMES) {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        *slot = n as u64;
    }
    let [snapshot_count, movement_count, signal_count, contradiction_count, governance_count, audit_count, run_count] =
        counts;
    Ok(TalentFlowStorageStats {
        snapshot_count,
        movement_count,
        signal_count,
        contradiction_count,
        governance_count,
        audit_count,
        run_count,
    })
}
