//! Per-person evaluation errors. Isolated to the person; never abort a batch.

use super::error_code::{self, TalentFlowErrorCode};
use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Malformed input: {reason}")]
    InputMalformed { reason: String },

    #[error("Persistence failed for person {person_id} during {stage}: {source}")]
    PersistenceFailed {
        person_id: String,
        stage: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Snapshot lookup failed for person {person_id}: {source}")]
    LookupFailed {
        person_id: String,
        #[source]
        source: StorageError,
    },
}

impl TalentFlowErrorCode for EvaluationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InputMalformed { .. } => error_code::INPUT_MALFORMED,
            Self::PersistenceFailed { source, .. } | Self::LookupFailed { source, .. } => {
                source.error_code()
            }
        }
    }
}
