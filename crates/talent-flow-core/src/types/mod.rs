//! Data model: person states, snapshots, movements, signals, contradictions,
//! governance bookkeeping, audit events, and run summaries.

pub mod audit;
pub mod movement;
pub mod person;
pub mod records;
pub mod summary;

pub use audit::{AuditEvent, AuditEventType, AuditSeverity};
pub use movement::MovementType;
pub use person::{derive_title_level, DataSource, Field, PersonState};
pub use records::{
    Contradiction, ContradictionKind, GovernanceState, Movement, Severity, Signal, Snapshot,
};
pub use summary::RunSummary;
