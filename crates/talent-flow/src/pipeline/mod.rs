//! Per-person evaluation and the batch runner.

pub mod evaluator;
pub mod runner;

pub use evaluator::PersonEvaluator;
pub use runner::{RunOutcome, TalentFlowRunner};
