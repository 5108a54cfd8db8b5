//! `StorageAuditSink`: every event to tracing, and to `talent_flow_audit_log`
//! when persistence is enabled.

use std::sync::Arc;

use talent_flow_core::traits::{AuditSink, ITalentFlowStorage, TracingAuditSink};
use talent_flow_core::types::AuditEvent;

pub struct StorageAuditSink {
    store: Arc<dyn ITalentFlowStorage>,
    persist: bool,
}

impl StorageAuditSink {
    pub fn new(store: Arc<dyn ITalentFlowStorage>, persist: bool) -> Self {
        Self { store, persist }
    }
}

impl AuditSink for StorageAuditSink {
    fn record(&self, event: &AuditEvent) {
        TracingAuditSink.record(event);
        if !self.persist {
            return;
        }
        // Best-effort (RecoveryAction::Ignore): an audit write never fails a person.
        if let Err(e) = self.store.record_audit_event(event) {
            tracing::warn!(
                person_id = %event.person_id,
                event_type = %event.event_type,
                error = %e,
                "audit event not persisted"
            );
        }
    }
}
