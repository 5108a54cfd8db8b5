//! Schema versioning through a dedicated single-row version table.

use rusqlite::Connection;
use talent_flow_core::errors::StorageError;
use tracing::info;

use super::schema::TALENT_FLOW_TABLES_V1;

/// Current schema version. Bump this when adding new migrations.
pub const CURRENT_VERSION: u32 = 1;

/// Get the current schema version. 0 = fresh database.
pub fn get_schema_version(conn: &Connection) -> Result<u32, StorageError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='talent_flow_schema_version'",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(0);
    }

    match conn.query_row(
        "SELECT version FROM talent_flow_schema_version LIMIT 1",
        [],
        |row| row.get::<_, u32>(0),
    ) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: u32) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS talent_flow_schema_version (
            version INTEGER NOT NULL
        ) STRICT;",
    )?;
    conn.execute("DELETE FROM talent_flow_schema_version", [])?;
    conn.execute(
        "INSERT INTO talent_flow_schema_version (version) VALUES (?1)",
        rusqlite::params![version],
    )?;
    Ok(())
}

/// Run all pending migrations to bring the database up to `CURRENT_VERSION`.
///
/// Each step runs in its own transaction. Returns the resulting version.
pub fn migrate(conn: &Connection) -> Result<u32, StorageError> {
    let current = get_schema_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(current);
    }

    if current < 1 {
        info!("Migrating talent flow schema: 0 → 1 (initial tables)");
        apply_step(conn, 1, TALENT_FLOW_TABLES_V1)?;
    }

    let final_version = get_schema_version(conn)?;
    info!(from = current, to = final_version, "Talent flow schema migration complete");
    Ok(final_version)
}

fn apply_step(conn: &Connection, version: u32, sql: &str) -> Result<(), StorageError> {
    let failed = |e: StorageError| StorageError::MigrationFailed {
        version,
        message: e.to_string(),
    };
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = conn
        .execute_batch(sql)
        .map_err(StorageError::from)
        .and_then(|_| set_schema_version(conn, version));
    match result {
        Ok(()) => {
            conn.execute_batch("COMMIT")?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(failed(e))
        }
    }
}
