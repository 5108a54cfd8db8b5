//! RecoveryAction enum: what to do when an engine operation fails.

use std::fmt;

use super::{EvaluationError, StorageError, TalentFlowError};

/// Recommended recovery action for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation (transient failure like SQLITE_BUSY).
    Retry,
    /// Skip this person and continue the batch.
    Fallback,
    /// Escalate to the caller; this error cannot be handled silently.
    Escalate,
    /// Ignore the error; the operation was best-effort (e.g., audit recording).
    Ignore,
}

impl RecoveryAction {
    /// Recovery for a storage error.
    pub fn for_storage(error: &StorageError) -> Self {
        match error {
            StorageError::DbBusy => Self::Retry,
            StorageError::LockPoisoned(_) => Self::Escalate,
            StorageError::OpenFailed { .. } => Self::Escalate,
            StorageError::MigrationFailed { .. } => Self::Escalate,
            // Duplicate (person_id, snapshot_date) or movement_id: retrying cannot help.
            StorageError::Constraint { .. } => Self::Fallback,
            StorageError::CorruptRow { .. } => Self::Fallback,
            StorageError::Serialization(_) => Self::Fallback,
            StorageError::SqliteError { .. } => Self::Fallback,
            StorageError::RetriesExhausted { .. } => Self::Fallback,
        }
    }

    /// Recovery for any engine error.
    pub fn for_error(error: &TalentFlowError) -> Self {
        match error {
            TalentFlowError::Config(_) => Self::Escalate,
            TalentFlowError::Storage(e) => Self::for_storage(e),
            TalentFlowError::Evaluation(EvaluationError::InputMalformed { .. }) => Self::Fallback,
            TalentFlowError::Evaluation(EvaluationError::PersistenceFailed { source, .. })
            | TalentFlowError::Evaluation(EvaluationError::LookupFailed { source, .. }) => {
                match Self::for_storage(source) {
                    Self::Escalate => Self::Escalate,
                    _ => Self::Fallback,
                }
            }
            TalentFlowError::Serialization(_) => Self::Fallback,
            TalentFlowError::Cancelled => Self::Ignore,
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "Retry"),
            Self::Fallback => write!(f, "Fallback"),
            Self::Escalate => write!(f, "Escalate"),
            Self::Ignore => write!(f, "Ignore"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn test_busy_is_retry() {
        assert_eq!(RecoveryAction::for_storage(&StorageError::DbBusy), RecoveryAction::Retry);
    }

    #[test]
    fn test_config_escalates() {
        let e = TalentFlowError::Config(ConfigError::invalid("scoring", "bad"));
        assert_eq!(RecoveryAction::for_error(&e), RecoveryAction::Escalate);
    }

    #[test]
    fn test_persistence_failure_falls_back_to_next_person() {
        let e = TalentFlowError::Evaluation(EvaluationError::PersistenceFailed {
            person_id: "p1".into(),
            stage: "movement",
            source: StorageError::DbBusy,
        });
        assert_eq!(RecoveryAction::for_error(&e), RecoveryAction::Fallback);
    }
}
