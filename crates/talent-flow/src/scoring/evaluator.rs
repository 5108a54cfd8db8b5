//! Evaluate-then-filter: score every classification and drop the ones under
//! their type's threshold in the same step.
//!
//! `ScoredMovement` can only be built here, so nothing downstream can hold
//! a sub-threshold candidate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use talent_flow_core::config::{ModifierConfig, TalentFlowConfig};
use talent_flow_core::types::{MovementType, PersonState};

use super::scorer::{ConfidenceScorer, ScoreBreakdown};
use crate::classification::Classification;

/// A classification whose confidence cleared `min_confidence`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovement {
    movement_type: MovementType,
    matched_rules: Vec<String>,
    breakdown: ScoreBreakdown,
}

impl ScoredMovement {
    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn confidence(&self) -> f64 {
        self.breakdown.confidence
    }

    pub fn raw_weight(&self) -> f64 {
        self.breakdown.raw_weight
    }

    pub fn matched_rules(&self) -> &[String] {
        &self.matched_rules
    }

    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }
}

/// A classification discarded for low confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub movement_type: MovementType,
    pub confidence: f64,
    pub min_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub accepted: Vec<ScoredMovement>,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, Clone)]
struct Policy {
    min_confidence: f64,
    modifier: ModifierConfig,
}

#[derive(Debug, Clone)]
pub struct MovementEvaluator {
    scorer: ConfidenceScorer,
    policies: BTreeMap<MovementType, Policy>,
}

impl MovementEvaluator {
    pub fn from_config(config: &TalentFlowConfig) -> Self {
        let policies = MovementType::ALL
            .iter()
            .map(|&t| {
                let cfg = config.effective_movement(t);
                (
                    t,
                    Policy {
                        min_confidence: cfg.effective_min_confidence(),
                        modifier: cfg.effective_modifier(),
                    },
                )
            })
            .collect();
        Self {
            scorer: ConfidenceScorer::from_config(&config.scoring),
            policies,
        }
    }

    pub fn scorer(&self) -> &ConfidenceScorer {
        &self.scorer
    }

    pub fn min_confidence(&self, movement_type: MovementType) -> f64 {
        self.policies
            .get(&movement_type)
            .map_or(1.0, |p| p.min_confidence)
    }

    /// Confidence factors for one classification, threshold not applied.
    pub fn score(
        &self,
        classification: &Classification,
        state: &PersonState,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        let modifier = self
            .policies
            .get(&classification.movement_type)
            .map_or(0.0, |p| {
                let waived = p
                    .modifier
                    .waived_by_rules
                    .iter()
                    .any(|rule| classification.matched(rule));
                if waived {
                    0.0
                } else {
                    p.modifier.adjustment
                }
            });
        self.scorer
            .score(classification.raw_weight, state, modifier, now)
    }

    /// Score every classification against the new state and keep those at or
    /// above their type's `min_confidence`.
    pub fn evaluate(
        &self,
        classifications: Vec<Classification>,
        state: &PersonState,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();
        for classification in classifications {
            let breakdown = self.score(&classification, state, now);
            let min_confidence = self.min_confidence(classification.movement_type);
            if breakdown.confidence >= min_confidence {
                evaluation.accepted.push(ScoredMovement {
                    movement_type: classification.movement_type,
                    matched_rules: classification.matched_rules,
                    breakdown,
                });
            } else {
                tracing::debug!(
                    person_id = %state.person_id,
                    movement_type = %classification.movement_type,
                    confidence = breakdown.confidence,
                    min_confidence,
                    "below threshold, discarded"
                );
                evaluation.rejected.push(Rejected {
                    movement_type: classification.movement_type,
                    confidence: breakdown.confidence,
                    min_confidence,
                });
            }
        }
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use talent_flow_core::types::DataSource;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap()
    }

    fn classification(t: MovementType, weight: f64, rules: &[&str]) -> Classification {
        Classification {
            movement_type: t,
            raw_weight: weight,
            matched_rules: rules.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn fresh(source: DataSource) -> PersonState {
        let mut s = PersonState::new("p1", now() - Duration::days(1));
        s.data_source = source;
        s
    }

    #[test]
    fn test_accepts_above_threshold() {
        let ev = MovementEvaluator::from_config(&TalentFlowConfig::default());
        let out = ev.evaluate(
            vec![classification(MovementType::Hire, 0.9, &["company_changed_with_title"])],
            &fresh(DataSource::LinkedIn),
            now(),
        );
        assert_eq!(out.accepted.len(), 1);
        assert!(out.accepted[0].confidence() >= 0.8);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn test_low_trust_source_is_discarded() {
        let ev = MovementEvaluator::from_config(&TalentFlowConfig::default());
        let out = ev.evaluate(
            vec![classification(MovementType::Hire, 0.7, &["company_changed"])],
            &fresh(DataSource::Unknown),
            now(),
        );
        assert!(out.accepted.is_empty());
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].min_confidence, 0.6);
    }

    #[test]
    fn test_promotion_penalty_waived_by_keyword_rule() {
        let ev = MovementEvaluator::from_config(&TalentFlowConfig::default());
        let state = fresh(DataSource::LinkedIn);
        let penalized = ev.score(
            &classification(MovementType::Promotion, 0.85, &["title_level_increased"]),
            &state,
            now(),
        );
        let waived = ev.score(
            &classification(
                MovementType::Promotion,
                0.85,
                &["title_level_increased", "title_keyword_promotion"],
            ),
            &state,
            now(),
        );
        assert!((penalized.modifier + 0.05).abs() < 1e-12);
        assert_eq!(waived.modifier, 0.0);
        assert!(waived.confidence > penalized.confidence);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = TalentFlowConfig::from_toml("[movements.transfer]\nmin_confidence = 0.7\n").unwrap();
        let ev = MovementEvaluator::from_config(&config);
        let out = ev.evaluate(
            vec![classification(MovementType::Transfer, 0.7, &["lateral_title_change"])],
            &fresh(DataSource::LinkedIn),
            now(),
        );
        assert_eq!(out.accepted.len(), 1);
    }
}
