//! Trait seams: persistence, audit, enrichment capabilities, cancellation.

pub mod audit;
pub mod cancellation;
pub mod enrichment;
pub mod storage;

pub use audit::{AuditSink, NoopAuditSink, TracingAuditSink};
pub use cancellation::{Cancellable, CancellationToken};
pub use enrichment::{CompanyLookup, EmailPattern, EmailPatternSource, LinkedInResolver};
pub use storage::{ITalentFlowStorage, RetentionReport, TalentFlowStorageStats};
