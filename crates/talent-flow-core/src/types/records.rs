//! Persisted records: snapshots, movements, signals, contradictions, governance state.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::movement::MovementType;
use super::person::{DataSource, PersonState};

/// A persisted `PersonState` plus its fingerprint.
/// At most one per `(person_id, snapshot_date)`; older snapshots are retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub person_id: String,
    pub state: PersonState,
    pub fingerprint: String,
    pub snapshot_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A detected, accepted transition. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub movement_id: String,
    pub person_id: String,
    pub movement_type: MovementType,
    /// In [0,1], never below the type's `min_confidence`.
    pub confidence: f64,
    pub old_state: PersonState,
    pub new_state: PersonState,
    pub data_source: DataSource,
    /// Matched rule names, raw weight, and scoring breakdown.
    pub metadata: serde_json::Value,
    pub detected_at: DateTime<Utc>,
}

/// Downstream intent-scoring event derived 1:1 from a `Movement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_id: String,
    pub person_id: String,
    pub company_id: Option<String>,
    /// `movement_<type>`.
    pub signal_type: String,
    pub signal_weight: i64,
    /// The originating `movement_id`.
    pub source_id: String,
    pub detected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly patterns between an old and a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    /// Company name changed while both sides carry the same `company_id`.
    CompanyNameChangedIdStable,
    /// `company_id` changed while the company name did not.
    CompanyIdChangedNameStable,
    /// An end date disappeared at the same company.
    EndDateCleared,
    /// The start date moved backwards at the same company.
    StartDateRegressed,
    /// Title level decreased at the same company.
    TitleLevelDropped,
    /// Two conflicting movement types tied on raw rule weight.
    AmbiguousMovement,
}

impl ContradictionKind {
    pub const ALL: [ContradictionKind; 6] = [
        ContradictionKind::CompanyNameChangedIdStable,
        ContradictionKind::CompanyIdChangedNameStable,
        ContradictionKind::EndDateCleared,
        ContradictionKind::StartDateRegressed,
        ContradictionKind::TitleLevelDropped,
        ContradictionKind::AmbiguousMovement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyNameChangedIdStable => "company_name_changed_id_stable",
            Self::CompanyIdChangedNameStable => "company_id_changed_name_stable",
            Self::EndDateCleared => "end_date_cleared",
            Self::StartDateRegressed => "start_date_regressed",
            Self::TitleLevelDropped => "title_level_dropped",
            Self::AmbiguousMovement => "ambiguous_movement",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }

    /// Severity used when the config does not override it.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::CompanyNameChangedIdStable
            | Self::StartDateRegressed
            | Self::TitleLevelDropped => Severity::Low,
            Self::CompanyIdChangedNameStable
            | Self::EndDateCleared
            | Self::AmbiguousMovement => Severity::Medium,
        }
    }
}

impl fmt::Display for ContradictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory flag for external review. Never blocks movement persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    pub contradiction_id: String,
    pub person_id: String,
    pub contradiction_type: ContradictionKind,
    pub severity: Severity,
    pub old_state: PersonState,
    pub new_state: PersonState,
    /// Human-readable description of which fields disagree.
    pub detail: String,
    /// Set externally once reviewed.
    pub resolved: bool,
    pub detected_at: DateTime<Utc>,
}

/// Per-person bookkeeping for the safety rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceState {
    pub person_id: String,
    pub last_movement_at: Option<DateTime<Utc>>,
    /// Accepted movements in `period_key`.
    pub movements_this_period: u32,
    /// Governance period the counter belongs to (`YYYY-MM`).
    pub period_key: String,
}

impl GovernanceState {
    pub fn new(person_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            last_movement_at: None,
            movements_this_period: 0,
            period_key: String::new(),
        }
    }

    /// Counter value for `period_key`. A counter from another period reads as zero.
    pub fn movements_in(&self, period_key: &str) -> u32 {
        if self.period_key == period_key {
            self.movements_this_period
        } else {
            0
        }
    }

    /// Record one accepted movement at `now` in `period_key`.
    pub fn record_movement(&mut self, now: DateTime<Utc>, period_key: &str) {
        let count = self.movements_in(period_key);
        self.period_key = period_key.to_string();
        self.movements_this_period = count + 1;
        self.last_movement_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_resets_across_periods() {
        let mut gov = GovernanceState::new("p1");
        let now = Utc::now();
        gov.record_movement(now, "2026-09");
        gov.record_movement(now, "2026-09");
        assert_eq!(gov.movements_in("2026-09"), 2);
        assert_eq!(gov.movements_in("2026-10"), 0);

        gov.record_movement(now, "2026-10");
        assert_eq!(gov.movements_this_period, 1);
        assert_eq!(gov.period_key, "2026-10");
    }

    #[test]
    fn test_contradiction_kind_parse() {
        for k in ContradictionKind::ALL {
            assert_eq!(ContradictionKind::parse(k.as_str()), Some(k));
        }
        assert_eq!(ContradictionKind::parse("bogus"), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }
}
