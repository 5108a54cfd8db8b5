//! Compiled defaults shared across the workspace.

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "TALENT_FLOW_LOG";

/// Environment variable switching log output to JSON lines.
pub const LOG_JSON_ENV: &str = "TALENT_FLOW_LOG_JSON";

/// Default tracing filter when `TALENT_FLOW_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "talent_flow=info,talent_flow_core=info";

/// Project config file name looked up in the working root.
pub const CONFIG_FILE_NAME: &str = "talent_flow.toml";

/// Prefix for environment overrides (`TALENT_FLOW_GOVERNANCE_MAX_MOVEMENTS_PER_PERIOD`, ...).
pub const ENV_PREFIX: &str = "TALENT_FLOW_";

/// Days a person stays "active" after their last observed update.
pub const DEFAULT_ACTIVE_WINDOW_DAYS: u32 = 30;

/// Hard cap on candidates evaluated in one run. Excess is deferred.
pub const DEFAULT_MAX_CANDIDATES_PER_RUN: usize = 10_000;

/// Length of one evaluation period (the monthly schedule).
pub const DEFAULT_EVALUATION_PERIOD_DAYS: u32 = 30;

/// Cooldown expressed as a multiple of the evaluation period.
pub const DEFAULT_COOLDOWN_PERIODS: u32 = 7;

/// Accepted movements per person per governance period.
pub const DEFAULT_MAX_MOVEMENTS_PER_PERIOD: u32 = 2;

/// Upper bound of the completeness bonus.
pub const DEFAULT_COMPLETENESS_MAX_BONUS: f64 = 0.05;

/// Multiplier for observations older than every recency step.
pub const DEFAULT_RECENCY_FLOOR: f64 = 0.4;

/// Trust multiplier for data sources missing from the source table.
pub const DEFAULT_UNKNOWN_SOURCE_WEIGHT: f64 = 0.5;

/// Persistence retry defaults.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_RETRY_INITIAL_BACKOFF_MS: u64 = 50;
pub const DEFAULT_RETRY_MAX_BACKOFF_MS: u64 = 2_000;

/// Retention for the audit log and run history.
pub const DEFAULT_AUDIT_RETENTION_DAYS: u32 = 180;
pub const RUN_HISTORY_RETENTION_DAYS: u32 = 365;

/// Signal type prefix: `movement_` + movement type.
pub const SIGNAL_TYPE_PREFIX: &str = "movement_";

/// Seconds per day, for timestamp arithmetic against SQLite integers.
pub const SECONDS_PER_DAY: i64 = 86_400;
