//! ConnectionPool: writer + read pool with round-robin selection.
//!
//! The only place in the crate that holds `Mutex<Connection>`.
//! All other code accesses storage through `ITalentFlowStorage` trait methods.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use talent_flow_core::errors::StorageError;

use super::pragmas::{configure_connection, configure_readonly_connection};

/// Connection pool: 1 writer + N readers.
///
/// A single writer serializes every write, so the four commit writes for
/// one person are never interleaved with another worker's at the SQL level.
pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_index: AtomicUsize,
}

impl ConnectionPool {
    /// Open a file-backed pool with `read_pool_size` readers.
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u64) -> Result<Self, StorageError> {
        let open_failed = |e: rusqlite::Error| StorageError::OpenFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let writer = Connection::open(path).map_err(open_failed)?;
        configure_connection(&writer, busy_timeout_ms)?;

        let mut readers = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(open_failed)?;
            configure_readonly_connection(&reader, busy_timeout_ms)?;
            readers.push(Mutex::new(reader));
        }

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            read_index: AtomicUsize::new(0),
        })
    }

    /// Open an in-memory pool. With no readers, reads go through the writer,
    /// so every operation sees the same database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(|e| StorageError::OpenFailed {
            path: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        configure_connection(&writer, 5000)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            read_index: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with the writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| StorageError::LockPoisoned(format!("writer: {e}")))?;
        f(&conn)
    }

    /// Execute a closure with a reader connection (round-robin).
    /// Falls back to the writer when there are no readers (in-memory mode).
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }

        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index]
            .lock()
            .map_err(|e| StorageError::LockPoisoned(format!("reader {index}: {e}")))?;
        f(&conn)
    }

    /// Check WAL mode on the writer connection.
    pub fn is_wal_mode(&self) -> bool {
        self.with_writer(|conn| {
            let mode: String = conn
                .query_row("PRAGMA journal_mode", [], |row| row.get(0))
                .unwrap_or_default();
            Ok(mode.eq_ignore_ascii_case("wal"))
        })
        .unwrap_or(false)
    }
}
