//! Storage configuration: database location, pool size, retry policy, retention.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUDIT_RETENTION_DAYS, DEFAULT_RETRY_INITIAL_BACKOFF_MS, DEFAULT_RETRY_MAX_ATTEMPTS,
    DEFAULT_RETRY_MAX_BACKOFF_MS, RUN_HISTORY_RETENTION_DAYS,
};

/// Bounded exponential backoff for transient storage failures.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first. Default: 4.
    pub max_attempts: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
}

impl RetryConfig {
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_RETRY_MAX_ATTEMPTS)
    }

    pub fn effective_initial_backoff_ms(&self) -> u64 {
        self.initial_backoff_ms
            .unwrap_or(DEFAULT_RETRY_INITIAL_BACKOFF_MS)
    }

    pub fn effective_max_backoff_ms(&self) -> u64 {
        self.max_backoff_ms.unwrap_or(DEFAULT_RETRY_MAX_BACKOFF_MS)
    }

    /// Backoff before retry number `attempt` (1-based), doubling and capped.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let shift = attempt.saturating_sub(1).min(20);
        self.effective_initial_backoff_ms()
            .saturating_mul(1u64 << shift)
            .min(self.effective_max_backoff_ms())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database. Default: `talent_flow.db` in the working directory.
    pub db_path: Option<String>,
    /// Read connections in the pool. Default: 4.
    pub read_pool_size: Option<usize>,
    /// SQLite busy_timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u64>,
    /// Audit log retention. Default: 180 days.
    pub audit_retention_days: Option<u32>,
    /// Run history retention. Default: 365 days.
    pub run_retention_days: Option<u32>,
    /// Write audit events to the database as well as the log. Default: true.
    pub persist_audit: Option<bool>,
    pub retry: RetryConfig,
}

impl StorageConfig {
    pub fn effective_db_path(&self) -> String {
        self.db_path
            .clone()
            .unwrap_or_else(|| "talent_flow.db".to_string())
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(4)
    }

    pub fn effective_busy_timeout_ms(&self) -> u64 {
        self.busy_timeout_ms.unwrap_or(5000)
    }

    pub fn effective_audit_retention_days(&self) -> u32 {
        self.audit_retention_days
            .unwrap_or(DEFAULT_AUDIT_RETENTION_DAYS)
    }

    pub fn effective_run_retention_days(&self) -> u32 {
        self.run_retention_days.unwrap_or(RUN_HISTORY_RETENTION_DAYS)
    }

    pub fn effective_persist_audit(&self) -> bool {
        self.persist_audit.unwrap_or(true)
    }
}
