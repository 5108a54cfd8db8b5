//! Storage-layer errors.

use super::error_code::{self, TalentFlowErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    #[error("Constraint violated: {message}")]
    Constraint { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Connection lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Failed to open database {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        last_error: String,
    },
}

impl StorageError {
    /// Transient failures that a bounded retry may clear.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DbBusy)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref err, ref msg) => match err.code {
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                    Self::DbBusy
                }
                rusqlite::ErrorCode::ConstraintViolation => Self::Constraint {
                    message: msg.clone().unwrap_or_else(|| err.to_string()),
                },
                _ => Self::SqliteError {
                    message: e.to_string(),
                },
            },
            other => Self::SqliteError {
                message: other.to_string(),
            },
        }
    }
}

impl TalentFlowErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::Constraint { .. } => error_code::CONSTRAINT_VIOLATION,
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
            Self::RetriesExhausted { .. } => error_code::RETRIES_EXHAUSTED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
