//! Contradiction observer. Side-effect only: findings are recorded for
//! review and never block movement persistence.

use chrono::{DateTime, NaiveDate, Utc};
use talent_flow_core::config::ContradictionConfig;
use talent_flow_core::types::{Contradiction, ContradictionKind, MovementType, PersonState};

use crate::emission::contradiction_id_for;
use crate::scoring::same_employer;

/// The last snapshot and the incoming state a contradiction is found on.
/// The snapshot date and fingerprint pair key the contradiction id, so the
/// same transition seen twice is recorded once.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub old: &'a PersonState,
    pub new: &'a PersonState,
    pub old_snapshot_date: NaiveDate,
    pub old_fingerprint: &'a str,
    pub new_fingerprint: &'a str,
}

#[derive(Debug, Clone)]
pub struct ContradictionDetector {
    config: ContradictionConfig,
}

fn text_key(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

impl ContradictionDetector {
    pub fn from_config(config: &ContradictionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn build(
        &self,
        kind: ContradictionKind,
        transition: &Transition<'_>,
        detail: String,
        now: DateTime<Utc>,
    ) -> Contradiction {
        let new = transition.new;
        Contradiction {
            contradiction_id: contradiction_id_for(
                &new.person_id,
                kind,
                transition.old_snapshot_date,
                transition.old_fingerprint,
                transition.new_fingerprint,
            ),
            person_id: new.person_id.clone(),
            contradiction_type: kind,
            severity: self.config.severity_of(kind),
            old_state: transition.old.clone(),
            new_state: new.clone(),
            detail,
            resolved: false,
            detected_at: now,
        }
    }

    /// State-pair patterns, in `ContradictionKind` order.
    pub fn detect(&self, transition: &Transition<'_>, now: DateTime<Utc>) -> Vec<Contradiction> {
        let (old, new) = (transition.old, transition.new);
        let mut found = Vec::new();
        let mut flag = |kind: ContradictionKind, detail: String| {
            if self.config.is_enabled(kind) {
                found.push(self.build(kind, transition, detail, now));
            }
        };

        let old_name = text_key(old.company_name.as_deref());
        let new_name = text_key(new.company_name.as_deref());
        let employer_stable = same_employer(old, new);

        if let (Some(old_id), Some(new_id)) = (old.company_id.as_deref(), new.company_id.as_deref()) {
            let ids_equal = old_id.trim() == new_id.trim();
            if ids_equal && old_name.is_some() && new_name.is_some() && old_name != new_name {
                flag(
                    ContradictionKind::CompanyNameChangedIdStable,
                    format!(
                        "company_name {:?} -> {:?} with company_id {old_id} unchanged",
                        old.company_name.as_deref().unwrap_or_default(),
                        new.company_name.as_deref().unwrap_or_default(),
                    ),
                );
            }
            if !ids_equal && employer_stable {
                flag(
                    ContradictionKind::CompanyIdChangedNameStable,
                    format!("company_id {old_id} -> {new_id} with company_name unchanged"),
                );
            }
        }

        if employer_stable {
            if let (Some(end), None) = (old.end_date, new.end_date) {
                flag(
                    ContradictionKind::EndDateCleared,
                    format!("end_date {end} cleared at the same company"),
                );
            }
            if let (Some(before), Some(after)) = (old.start_date, new.start_date) {
                if after < before {
                    flag(
                        ContradictionKind::StartDateRegressed,
                        format!("start_date moved back from {before} to {after}"),
                    );
                }
            }
            if let (Some(before), Some(after)) = (old.title_level, new.title_level) {
                if before > 0 && after > 0 && after < before {
                    flag(
                        ContradictionKind::TitleLevelDropped,
                        format!("title_level dropped from {before} to {after}"),
                    );
                }
            }
        }

        found
    }

    /// Record an exact raw-weight tie between conflicting types. `tied` is
    /// winner first.
    pub fn ambiguous(
        &self,
        transition: &Transition<'_>,
        tied: &[MovementType],
        raw_weight: f64,
        now: DateTime<Utc>,
    ) -> Option<Contradiction> {
        let kind = ContradictionKind::AmbiguousMovement;
        if tied.len() < 2 || !self.config.is_enabled(kind) {
            return None;
        }
        let names: Vec<&str> = tied.iter().map(MovementType::as_str).collect();
        Some(self.build(
            kind,
            transition,
            format!(
                "{} tied at raw weight {raw_weight}; kept {}",
                names.join(", "),
                names[0]
            ),
            now,
        ))
    }
}
