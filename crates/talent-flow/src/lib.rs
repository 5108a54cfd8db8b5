//! # talent-flow
//!
//! The Talent Flow engine. Takes batches of observed employment states,
//! compares each against the person's last snapshot, and turns material
//! changes into scored, governed movements and CRM signals.
//!
//! ## Modules
//! - `selection`: active-window filtering, dedup, per-run cap
//! - `enrichment`: company, LinkedIn, email-pattern gap filling
//! - `diff`: normalized fingerprints and changed-field sets
//! - `classification`: typed predicate rules per movement type
//! - `scoring`: confidence, thresholds, same-employer conflict resolution
//! - `governance`: contradictions, cooldown, per-period rate cap
//! - `emission`: deterministic movement/signal IDs, ordered commit, retry
//! - `pipeline`: per-person evaluator and the parallel batch runner
//! - `audit`: audit sinks (storage-backed, recording)
//! - `storage`: SQLite PRAGMAs, migrations, schema, tables, retention

pub mod audit;
pub mod classification;
pub mod diff;
pub mod emission;
pub mod enrichment;
pub mod governance;
pub mod pipeline;
pub mod scoring;
pub mod selection;
pub mod storage;

pub use audit::{RecordingAuditSink, StorageAuditSink};
pub use classification::{Classification, Classifier};
pub use diff::{ChangeSet, Fingerprinter};
pub use emission::{CommitPlan, CommitReport, SignalEmitter};
pub use enrichment::{FixtureData, StateEnricher};
pub use governance::{ContradictionDetector, SafetyGovernor};
pub use pipeline::{PersonEvaluator, RunOutcome, TalentFlowRunner};
pub use scoring::{ConfidenceScorer, MovementEvaluator, ScoredMovement};
pub use selection::{CandidateSelector, Selection};
pub use storage::SqliteTalentFlowStore;
