//! Candidate selection: validation, per-person dedupe, activity window, cap.

pub mod selector;

pub use selector::{CandidateSelector, Selection};
