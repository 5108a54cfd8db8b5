//! Safety governor configuration: evaluation period, cooldown, rate cap.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COOLDOWN_PERIODS, DEFAULT_EVALUATION_PERIOD_DAYS, DEFAULT_MAX_MOVEMENTS_PER_PERIOD,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Length of one evaluation period in days. Default: 30.
    pub evaluation_period_days: Option<u32>,
    /// Cooldown expressed in evaluation periods. Default: 7.
    pub cooldown_periods: Option<u32>,
    /// Explicit cooldown in days; wins over `cooldown_periods` when set.
    pub cooldown_days: Option<u32>,
    /// Maximum accepted movements per person per calendar month. Default: 2.
    pub max_movements_per_period: Option<u32>,
}

impl GovernanceConfig {
    pub fn effective_period_days(&self) -> u32 {
        self.evaluation_period_days
            .unwrap_or(DEFAULT_EVALUATION_PERIOD_DAYS)
    }

    /// Cooldown in days. Default: 7 periods of 30 days = 210.
    pub fn effective_cooldown_days(&self) -> u32 {
        self.cooldown_days.unwrap_or_else(|| {
            self.cooldown_periods
                .unwrap_or(DEFAULT_COOLDOWN_PERIODS)
                .saturating_mul(self.effective_period_days())
        })
    }

    pub fn effective_max_movements_per_period(&self) -> u32 {
        self.max_movements_per_period
            .unwrap_or(DEFAULT_MAX_MOVEMENTS_PER_PERIOD)
    }
}
