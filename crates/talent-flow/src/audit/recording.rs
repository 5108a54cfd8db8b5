//! In-memory sink for tests and dry runs.

use std::sync::Mutex;

use talent_flow_core::traits::AuditSink;
use talent_flow_core::types::{AuditEvent, AuditEventType};

#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count_of(&self, event_type: AuditEventType) -> usize {
        self.events
            .lock()
            .map(|events| events.iter().filter(|e| e.event_type == event_type).count())
            .unwrap_or(0)
    }

    pub fn for_person(&self, person_id: &str) -> Vec<AuditEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.person_id == person_id)
            .collect()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
