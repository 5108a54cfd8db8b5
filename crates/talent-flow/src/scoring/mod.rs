//! Confidence scoring, threshold filtering, and conflict resolution.

pub mod conflict;
pub mod evaluator;
pub mod scorer;

pub use conflict::{resolve_conflicts, same_employer, Resolution};
pub use evaluator::{Evaluation, MovementEvaluator, Rejected, ScoredMovement};
pub use scorer::{ConfidenceScorer, ScoreBreakdown};
