//! Error handling for Talent Flow.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod chain;
pub mod config_error;
pub mod error_code;
pub mod evaluation_error;
pub mod recovery;
pub mod storage_error;

pub use chain::{ChainedError, ErrorChain};
pub use config_error::ConfigError;
pub use error_code::TalentFlowErrorCode;
pub use evaluation_error::EvaluationError;
pub use recovery::RecoveryAction;
pub use storage_error::StorageError;

/// Aggregate error for engine entry points.
#[derive(Debug, thiserror::Error)]
pub enum TalentFlowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Run cancelled")]
    Cancelled,
}

impl TalentFlowErrorCode for TalentFlowError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Evaluation(e) => e.error_code(),
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

pub type TalentFlowResult<T> = Result<T, TalentFlowError>;
