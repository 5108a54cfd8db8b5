//! Cooldown and rate-cap guards.
//!
//! Guards run in order after scoring: a candidate that is vetoed by the
//! cooldown never reaches the rate cap. The hash-unchanged guard runs
//! earlier, before classification, in the person evaluator.

use chrono::{DateTime, Duration, Utc};
use talent_flow_core::config::GovernanceConfig;
use talent_flow_core::types::GovernanceState;

use super::period::period_key;
use crate::scoring::ScoredMovement;

/// Outcome of the cooldown and rate-cap guards for one person.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub admitted: Vec<ScoredMovement>,
    pub suppressed_cooldown: Vec<ScoredMovement>,
    pub suppressed_rate_cap: Vec<ScoredMovement>,
    /// Governance state to persist after the admitted movements commit.
    pub next_state: GovernanceState,
}

#[derive(Debug, Clone)]
pub struct SafetyGovernor {
    cooldown: Duration,
    max_per_period: u32,
}

impl SafetyGovernor {
    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self {
            cooldown: Duration::days(i64::from(config.effective_cooldown_days())),
            max_per_period: config.effective_max_movements_per_period(),
        }
    }

    /// Strictly inside the window: a movement exactly `cooldown` ago no
    /// longer blocks.
    pub fn in_cooldown(&self, state: &GovernanceState, now: DateTime<Utc>) -> bool {
        state
            .last_movement_at
            .is_some_and(|last| now - last < self.cooldown)
    }

    /// Movements still allowed in the period containing `now`.
    pub fn remaining_allowance(&self, state: &GovernanceState, now: DateTime<Utc>) -> u32 {
        self.max_per_period
            .saturating_sub(state.movements_in(&period_key(now)))
    }

    /// Apply the cooldown guard, then the rate cap. When the allowance is
    /// smaller than the candidate list, the highest-confidence movements win.
    pub fn admit(
        &self,
        state: &GovernanceState,
        candidates: Vec<ScoredMovement>,
        now: DateTime<Utc>,
    ) -> Admission {
        let mut admission = Admission {
            admitted: Vec::new(),
            suppressed_cooldown: Vec::new(),
            suppressed_rate_cap: Vec::new(),
            next_state: state.clone(),
        };
        if candidates.is_empty() {
            return admission;
        }

        if self.in_cooldown(state, now) {
            tracing::debug!(
                person_id = %state.person_id,
                last_movement_at = ?state.last_movement_at,
                "cooldown guard vetoed movements"
            );
            admission.suppressed_cooldown = candidates;
            return admission;
        }

        let allowance = self.remaining_allowance(state, now) as usize;
        let mut ranked = candidates;
        ranked.sort_by(|a, b| {
            b.confidence()
                .total_cmp(&a.confidence())
                .then_with(|| {
                    a.movement_type()
                        .tie_break_rank()
                        .cmp(&b.movement_type().tie_break_rank())
                })
        });
        if ranked.len() > allowance {
            admission.suppressed_rate_cap = ranked.split_off(allowance);
            tracing::debug!(
                person_id = %state.person_id,
                allowance,
                suppressed = admission.suppressed_rate_cap.len(),
                "rate cap guard suppressed movements"
            );
        }

        let key = period_key(now);
        for _ in &ranked {
            admission.next_state.record_movement(now, &key);
        }
        admission.admitted = ranked;
        admission
    }
}
