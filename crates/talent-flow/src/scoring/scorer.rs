//! `ConfidenceScorer`: raw rule weight to a clamped confidence in [0,1].
//!
//! ```text
//! confidence = clamp(raw * source_weight * recency + completeness + modifier,
//!                    floor, ceiling)
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use talent_flow_core::config::{RecencyStep, ScoringConfig};
use talent_flow_core::types::{DataSource, Field, PersonState};

/// Optional fields whose presence earns the completeness bonus.
const CORROBORATING_FIELDS: [Field; 3] = [Field::LinkedinUrl, Field::Department, Field::OrgLayer];

/// Every factor that went into one confidence value. Stored in movement metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub raw_weight: f64,
    pub source_weight: f64,
    pub recency_multiplier: f64,
    pub completeness_bonus: f64,
    pub modifier: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    source_weights: BTreeMap<DataSource, f64>,
    unknown_source_weight: f64,
    recency: Vec<RecencyStep>,
    recency_floor: f64,
    completeness_max_bonus: f64,
    floor: f64,
    ceiling: f64,
}

impl ConfidenceScorer {
    pub fn from_config(config: &ScoringConfig) -> Self {
        let source_weights = config
            .effective_source_weights()
            .into_iter()
            .filter_map(|(name, weight)| DataSource::parse(&name).map(|s| (s, weight)))
            .collect();
        Self {
            source_weights,
            unknown_source_weight: config.effective_unknown_source_weight(),
            recency: config.effective_recency(),
            recency_floor: config.effective_recency_floor(),
            completeness_max_bonus: config.effective_completeness_max_bonus(),
            floor: config.effective_confidence_floor(),
            ceiling: config.effective_confidence_ceiling(),
        }
    }

    pub fn source_weight(&self, source: DataSource) -> f64 {
        self.source_weights
            .get(&source)
            .copied()
            .unwrap_or(self.unknown_source_weight)
    }

    /// Step function of whole days since `observed_at`. Future observations
    /// count as age zero.
    pub fn recency_multiplier(&self, observed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let age_days = (now - observed_at).num_days().max(0);
        self.recency
            .iter()
            .find(|step| age_days <= i64::from(step.max_age_days))
            .map_or(self.recency_floor, |step| step.multiplier)
    }

    pub fn completeness_bonus(&self, state: &PersonState) -> f64 {
        let present = CORROBORATING_FIELDS
            .iter()
            .filter(|f| state.is_present(**f))
            .count();
        self.completeness_max_bonus * present as f64 / CORROBORATING_FIELDS.len() as f64
    }

    /// Score one candidate. `modifier` is the already-resolved movement
    /// adjustment (zero when waived).
    pub fn score(
        &self,
        raw_weight: f64,
        state: &PersonState,
        modifier: f64,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        let source_weight = self.source_weight(state.data_source);
        let recency_multiplier = self.recency_multiplier(state.observed_at, now);
        let completeness_bonus = self.completeness_bonus(state);
        let unclamped = raw_weight * source_weight * recency_multiplier + completeness_bonus + modifier;
        let confidence = if unclamped.is_finite() {
            unclamped.clamp(self.floor, self.ceiling)
        } else {
            self.floor
        };
        ScoreBreakdown {
            raw_weight,
            source_weight,
            recency_multiplier,
            completeness_bonus,
            modifier,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap()
    }

    fn scorer() -> ConfidenceScorer {
        ConfidenceScorer::from_config(&ScoringConfig::default())
    }

    #[test]
    fn test_recency_steps() {
        let s = scorer();
        assert_eq!(s.recency_multiplier(now() - Duration::days(1), now()), 1.0);
        assert_eq!(s.recency_multiplier(now() - Duration::days(7), now()), 1.0);
        assert_eq!(s.recency_multiplier(now() - Duration::days(8), now()), 0.95);
        assert_eq!(s.recency_multiplier(now() - Duration::days(90), now()), 0.85);
        assert_eq!(s.recency_multiplier(now() - Duration::days(200), now()), 0.6);
        assert_eq!(s.recency_multiplier(now() - Duration::days(400), now()), 0.4);
        assert_eq!(s.recency_multiplier(now() + Duration::days(3), now()), 1.0);
    }

    #[test]
    fn test_source_weights() {
        let s = scorer();
        assert_eq!(s.source_weight(DataSource::LinkedIn), 1.0);
        assert_eq!(s.source_weight(DataSource::CsvImport), 0.75);
        assert_eq!(s.source_weight(DataSource::Unknown), 0.5);
    }

    #[test]
    fn test_completeness_bonus_is_proportional() {
        let s = scorer();
        let mut state = PersonState::new("p1", now());
        assert_eq!(s.completeness_bonus(&state), 0.0);
        state.department = Some("Eng".into());
        assert!((s.completeness_bonus(&state) - 0.05 / 3.0).abs() < 1e-12);
        state.linkedin_url = Some("https://linkedin.com/in/p1".into());
        state.org_layer = Some(2);
        assert!((s.completeness_bonus(&state) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_score_clamps_to_ceiling() {
        let s = scorer();
        let mut state = PersonState::new("p1", now());
        state.data_source = DataSource::LinkedIn;
        state.department = Some("Eng".into());
        state.linkedin_url = Some("x".into());
        state.org_layer = Some(1);
        let b = s.score(1.0, &state, 0.0, now());
        assert_eq!(b.confidence, 1.0);
    }

    #[test]
    fn test_score_highest_trust_fresh_hire() {
        let s = scorer();
        let mut state = PersonState::new("p1", now() - Duration::days(1));
        state.data_source = DataSource::LinkedIn;
        let b = s.score(0.9, &state, 0.0, now());
        assert!((b.confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_negative_modifier_never_below_floor() {
        let s = scorer();
        let state = PersonState::new("p1", now());
        let b = s.score(0.0, &state, -0.5, now());
        assert_eq!(b.confidence, 0.0);
    }
}
