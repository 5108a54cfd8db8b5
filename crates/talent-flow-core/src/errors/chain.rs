//! Error chain builder for batch operations.
//!
//! Collects non-fatal per-person errors during a run so the caller
//! can inspect all failures rather than stopping at the first one.

use super::EvaluationError;

/// A single link in an error chain.
#[derive(Debug)]
pub struct ChainedError {
    /// The person whose evaluation failed.
    pub person_id: String,
    pub error: EvaluationError,
}

/// Accumulates per-person errors from a batch.
#[derive(Debug, Default)]
pub struct ErrorChain {
    errors: Vec<ChainedError>,
}

impl ErrorChain {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, person_id: impl Into<String>, error: EvaluationError) {
        self.errors.push(ChainedError {
            person_id: person_id.into(),
            error,
        });
    }

    /// Append every error from another chain.
    pub fn extend(&mut self, other: ErrorChain) {
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainedError> {
        self.errors.iter()
    }

    pub fn into_errors(self) -> Vec<ChainedError> {
        self.errors
    }
}
