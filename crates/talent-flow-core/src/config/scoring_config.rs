//! Confidence scoring configuration: source reliability, recency decay,
//! completeness bonus, and the final clamp range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMPLETENESS_MAX_BONUS, DEFAULT_RECENCY_FLOOR, DEFAULT_UNKNOWN_SOURCE_WEIGHT,
};
use crate::types::DataSource;

/// Multiplier applied when the observation is at most `max_age_days` old.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecencyStep {
    pub max_age_days: u32,
    pub multiplier: f64,
}

impl RecencyStep {
    pub const fn new(max_age_days: u32, multiplier: f64) -> Self {
        Self {
            max_age_days,
            multiplier,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-source reliability in [0,1], keyed by source name. Merged over the built-in table.
    pub source_weights: BTreeMap<String, f64>,
    /// Weight for sources absent from the table. Default: 0.5.
    pub unknown_source_weight: Option<f64>,
    /// Recency breakpoints. Empty = built-in table.
    pub recency: Vec<RecencyStep>,
    /// Multiplier beyond the last breakpoint. Default: 0.4.
    pub recency_floor: Option<f64>,
    /// Bonus when every optional corroborating field is present. Default: 0.05.
    pub completeness_max_bonus: Option<f64>,
    pub confidence_floor: Option<f64>,
    pub confidence_ceiling: Option<f64>,
}

impl ScoringConfig {
    pub fn default_source_weights() -> BTreeMap<String, f64> {
        [
            (DataSource::LinkedIn, 1.0),
            (DataSource::Manual, 0.95),
            (DataSource::Apollo, 0.9),
            (DataSource::Apify, 0.8),
            (DataSource::CsvImport, 0.75),
        ]
        .into_iter()
        .map(|(source, weight)| (source.as_str().to_string(), weight))
        .collect()
    }

    pub fn default_recency() -> Vec<RecencyStep> {
        vec![
            RecencyStep::new(7, 1.0),
            RecencyStep::new(30, 0.95),
            RecencyStep::new(90, 0.85),
            RecencyStep::new(365, 0.6),
        ]
    }

    pub fn effective_unknown_source_weight(&self) -> f64 {
        self.unknown_source_weight
            .unwrap_or(DEFAULT_UNKNOWN_SOURCE_WEIGHT)
    }

    /// Built-in weights with configured overrides applied.
    pub fn effective_source_weights(&self) -> BTreeMap<String, f64> {
        let mut weights = Self::default_source_weights();
        weights.extend(self.source_weights.iter().map(|(k, v)| (k.clone(), *v)));
        weights
    }

    /// Breakpoints sorted ascending by age.
    pub fn effective_recency(&self) -> Vec<RecencyStep> {
        let mut steps = if self.recency.is_empty() {
            Self::default_recency()
        } else {
            self.recency.clone()
        };
        steps.sort_by_key(|s| s.max_age_days);
        steps
    }

    pub fn effective_recency_floor(&self) -> f64 {
        self.recency_floor.unwrap_or(DEFAULT_RECENCY_FLOOR)
    }

    pub fn effective_completeness_max_bonus(&self) -> f64 {
        self.completeness_max_bonus
            .unwrap_or(DEFAULT_COMPLETENESS_MAX_BONUS)
    }

    pub fn effective_confidence_floor(&self) -> f64 {
        self.confidence_floor.unwrap_or(0.0)
    }

    pub fn effective_confidence_ceiling(&self) -> f64 {
        self.confidence_ceiling.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_override_merges_over_builtin() {
        let mut cfg = ScoringConfig::default();
        cfg.source_weights.insert("apify".into(), 0.5);
        let weights = cfg.effective_source_weights();
        assert_eq!(weights["apify"], 0.5);
        assert_eq!(weights["linkedin"], 1.0);
    }

    #[test]
    fn test_recency_sorted() {
        let cfg = ScoringConfig {
            recency: vec![RecencyStep::new(90, 0.5), RecencyStep::new(10, 1.0)],
            ..Default::default()
        };
        let steps = cfg.effective_recency();
        assert_eq!(steps[0].max_age_days, 10);
    }
}
