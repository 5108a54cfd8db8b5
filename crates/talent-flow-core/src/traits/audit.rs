//! `AuditSink`: receives one structured event per engine decision.
//!
//! Recording is best-effort. A sink must never fail the evaluation it observes.

use std::sync::Arc;

use crate::types::{AuditEvent, AuditSeverity};

pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, event: &AuditEvent) {
        (**self).record(event)
    }
}

/// Writes audit events to the `talent_flow::audit` tracing target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        let data = event.event_data.to_string();
        match event.severity {
            AuditSeverity::Info => tracing::debug!(
                target: "talent_flow::audit",
                worker_id = %event.worker_id,
                person_id = %event.person_id,
                event_type = %event.event_type,
                event_data = %data,
                "audit"
            ),
            AuditSeverity::Warning => tracing::warn!(
                target: "talent_flow::audit",
                worker_id = %event.worker_id,
                person_id = %event.person_id,
                event_type = %event.event_type,
                event_data = %data,
                "audit"
            ),
            AuditSeverity::Error => tracing::error!(
                target: "talent_flow::audit",
                worker_id = %event.worker_id,
                person_id = %event.person_id,
                event_type = %event.event_type,
                event_data = %data,
                "audit"
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}
