//! Structured audit events: every engine decision, including guard no-ops.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    InputMalformed,
    NotActive,
    Deferred,
    BaselineSnapshot,
    HashUnchanged,
    NoMovementDetected,
    BelowThreshold,
    CooldownSuppressed,
    RateCapSuppressed,
    MovementAccepted,
    SignalEmitted,
    ContradictionDetected,
    PersistenceFailed,
    Cancelled,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputMalformed => "input_malformed",
            Self::NotActive => "not_active",
            Self::Deferred => "deferred",
            Self::BaselineSnapshot => "baseline_snapshot",
            Self::HashUnchanged => "hash_unchanged",
            Self::NoMovementDetected => "no_movement_detected",
            Self::BelowThreshold => "below_threshold",
            Self::CooldownSuppressed => "cooldown_suppressed",
            Self::RateCapSuppressed => "rate_cap_suppressed",
            Self::MovementAccepted => "movement_accepted",
            Self::SignalEmitted => "signal_emitted",
            Self::ContradictionDetected => "contradiction_detected",
            Self::PersistenceFailed => "persistence_failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const ALL: [AuditEventType; 14] = [
        Self::InputMalformed,
        Self::NotActive,
        Self::Deferred,
        Self::BaselineSnapshot,
        Self::HashUnchanged,
        Self::NoMovementDetected,
        Self::BelowThreshold,
        Self::CooldownSuppressed,
        Self::RateCapSuppressed,
        Self::MovementAccepted,
        Self::SignalEmitted,
        Self::ContradictionDetected,
        Self::PersistenceFailed,
        Self::Cancelled,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warning,
    Error,
}

impl AuditSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// `{worker_id, person_id, event_type, event_data, severity}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub worker_id: String,
    pub person_id: String,
    pub event_type: AuditEventType,
    pub event_data: serde_json::Value,
    pub severity: AuditSeverity,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn info(
        worker_id: impl Into<String>,
        person_id: impl Into<String>,
        event_type: AuditEventType,
        event_data: serde_json::Value,
    ) -> Self {
        Self::with_severity(worker_id, person_id, event_type, event_data, AuditSeverity::Info)
    }

    pub fn with_severity(
        worker_id: impl Into<String>,
        person_id: impl Into<String>,
        event_type: AuditEventType,
        event_data: serde_json::Value,
        severity: AuditSeverity,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            person_id: person_id.into(),
            event_type,
            event_data,
            severity,
            recorded_at: Utc::now(),
        }
    }

    /// Stamp the event with the evaluation clock instead of wall time.
    pub fn at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }
}
