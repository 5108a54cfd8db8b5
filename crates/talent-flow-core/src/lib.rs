//! # talent-flow-core
//!
//! Foundation crate for the Talent Flow movement engine.
//! Defines the person/movement data model, configuration, errors, traits
//! (storage, audit, enrichment, cancellation), tracing setup, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{CliOverrides, Predicate, RuleConfig, TalentFlowConfig};
pub use errors::error_code::TalentFlowErrorCode;
pub use errors::{ConfigError, EvaluationError, StorageError, TalentFlowError, TalentFlowResult};
pub use traits::audit::{AuditSink, NoopAuditSink, TracingAuditSink};
pub use traits::cancellation::{Cancellable, CancellationToken};
pub use traits::enrichment::{CompanyLookup, EmailPattern, EmailPatternSource, LinkedInResolver};
pub use traits::storage::ITalentFlowStorage;
pub use types::{
    AuditEvent, AuditEventType, AuditSeverity, Contradiction, ContradictionKind, DataSource,
    Field, GovernanceState, Movement, MovementType, PersonState, RunSummary, Severity, Signal,
    Snapshot,
};
