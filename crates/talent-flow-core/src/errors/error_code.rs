//! Stable string codes for every error, for logs and the run history.

pub trait TalentFlowErrorCode {
    /// Returns the error code string (e.g., "DB_BUSY").
    fn error_code(&self) -> &'static str;

    /// `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const INPUT_MALFORMED: &str = "INPUT_MALFORMED";
pub const RETRIES_EXHAUSTED: &str = "RETRIES_EXHAUSTED";
pub const CANCELLED: &str = "CANCELLED";
