//! SQLite PRAGMA configuration.
//! Must be called on every connection immediately after opening.

use rusqlite::Connection;
use talent_flow_core::errors::StorageError;

/// Configure a SQLite connection with production-grade PRAGMAs:
/// - WAL for concurrent readers during writes
/// - busy_timeout for lock contention (primary concurrency mechanism)
/// - foreign keys so a signal can never reference a missing movement
/// - NORMAL synchronous for WAL durability trade-off
pub fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        "
    ))?;
    Ok(())
}

/// Configure a reader. Journal mode is owned by the writer; `query_only`
/// prevents accidental writes through this connection.
pub fn configure_readonly_connection(
    conn: &Connection,
    busy_timeout_ms: u64,
) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        PRAGMA query_only = ON;
        "
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_connection_sets_wal() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, 5000).unwrap();

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        // In-memory databases report "memory" instead of "wal"
        assert!(
            journal_mode == "wal" || journal_mode == "memory",
            "Expected wal or memory, got: {}",
            journal_mode
        );
    }

    #[test]
    fn test_configure_connection_sets_busy_timeout_and_fk() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, 1234).unwrap();

        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 1234);
        let fk: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_readonly_connection_rejects_writes() {
        let conn = Connection::open_in_memory().unwrap();
        configure_readonly_connection(&conn, 5000).unwrap();
        assert!(conn.execute_batch("CREATE TABLE t (x INTEGER)").is_err());
    }
}
