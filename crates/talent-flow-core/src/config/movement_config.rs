//! Per-movement-type configuration: acceptance threshold, signal weight,
//! confidence modifier, and the rule set.
//!
//! The built-in rule sets live here as data, so an operator can replace any
//! of them from `talent_flow.toml` without touching code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rule_config::{Predicate, RecentWindow, RuleConfig};
use crate::types::{Field, MovementType};

/// Fixed confidence adjustment for a movement type, waived when any of the
/// named rules matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModifierConfig {
    pub adjustment: f64,
    pub waived_by_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MovementTypeConfig {
    /// Disabled types are never classified. Default: true.
    pub enabled: Option<bool>,
    /// Movements below this confidence are discarded before governance.
    pub min_confidence: Option<f64>,
    /// `signal_weight = round(signal_base_weight * confidence)`.
    pub signal_base_weight: Option<u32>,
    pub modifier: Option<ModifierConfig>,
    /// Non-empty replaces the built-in rule set wholesale.
    pub rules: Vec<RuleConfig>,
}

impl MovementTypeConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(0.6)
    }

    pub fn effective_signal_base_weight(&self) -> u32 {
        self.signal_base_weight.unwrap_or(10)
    }

    pub fn effective_modifier(&self) -> ModifierConfig {
        self.modifier.clone().unwrap_or_default()
    }

    /// Apply `other` on top of `self`: `Some` values and non-empty rule lists win.
    pub fn overlay(&mut self, other: &MovementTypeConfig) {
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        if other.min_confidence.is_some() {
            self.min_confidence = other.min_confidence;
        }
        if other.signal_base_weight.is_some() {
            self.signal_base_weight = other.signal_base_weight;
        }
        if other.modifier.is_some() {
            self.modifier = other.modifier.clone();
        }
        if !other.rules.is_empty() {
            self.rules = other.rules.clone();
        }
    }

    /// Built-in configuration for a movement type.
    pub fn defaults_for(movement_type: MovementType) -> Self {
        match movement_type {
            MovementType::Hire => Self {
                enabled: Some(true),
                min_confidence: Some(0.6),
                signal_base_weight: Some(30),
                modifier: None,
                rules: hire_rules(),
            },
            MovementType::Exit => Self {
                enabled: Some(true),
                min_confidence: Some(0.6),
                signal_base_weight: Some(20),
                modifier: None,
                rules: exit_rules(),
            },
            MovementType::Promotion => Self {
                enabled: Some(true),
                min_confidence: Some(0.65),
                signal_base_weight: Some(25),
                modifier: Some(ModifierConfig {
                    adjustment: -0.05,
                    waived_by_rules: vec!["title_keyword_promotion".to_string()],
                }),
                rules: promotion_rules(),
            },
            MovementType::Transfer => Self {
                enabled: Some(true),
                min_confidence: Some(0.55),
                signal_base_weight: Some(15),
                modifier: None,
                rules: transfer_rules(),
            },
        }
    }
}

/// The built-in configuration for every movement type.
pub fn default_movements() -> BTreeMap<MovementType, MovementTypeConfig> {
    MovementType::ALL
        .iter()
        .map(|&t| (t, MovementTypeConfig::defaults_for(t)))
        .collect()
}

/// Keywords that mark a seniority step when newly present in a title.
pub const PROMOTION_KEYWORDS: &[&str] = &[
    "senior",
    "sr",
    "lead",
    "principal",
    "staff",
    "head",
    "manager",
    "director",
    "vp",
    "vice president",
    "chief",
];

fn same_company() -> [Predicate; 2] {
    [
        Predicate::FieldUnchanged(Field::CompanyName),
        Predicate::IsPresent(Field::CompanyName),
    ]
}

/// A company name change only counts as a move when the `company_id`
/// does not show the same employer on both sides.
fn company_id_not_stable() -> Predicate {
    Predicate::any([
        Predicate::FieldChanged(Field::CompanyId),
        Predicate::WasNull(Field::CompanyId),
        Predicate::IsNull(Field::CompanyId),
    ])
}

fn was_present(field: Field) -> Predicate {
    Predicate::not(Predicate::WasNull(field))
}

fn hire_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new(
            "company_changed_with_title",
            0.9,
            Predicate::all([
                Predicate::FieldChanged(Field::CompanyName),
                Predicate::IsPresent(Field::CompanyName),
                company_id_not_stable(),
                Predicate::IsPresent(Field::Title),
            ]),
        ),
        RuleConfig::new(
            "recent_start_at_new_company",
            0.85,
            Predicate::all([
                Predicate::FieldChanged(Field::CompanyName),
                Predicate::IsPresent(Field::CompanyName),
                company_id_not_stable(),
                Predicate::Recent(RecentWindow {
                    field: Field::StartDate,
                    days: 90,
                }),
            ]),
        ),
        RuleConfig::new(
            "company_appeared",
            0.8,
            Predicate::all([
                Predicate::WasNull(Field::CompanyName),
                Predicate::IsPresent(Field::CompanyName),
            ]),
        ),
        RuleConfig::new(
            "company_changed",
            0.7,
            Predicate::all([
                Predicate::FieldChanged(Field::CompanyName),
                Predicate::IsPresent(Field::CompanyName),
                company_id_not_stable(),
            ]),
        ),
    ]
}

fn exit_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new(
            "end_date_set",
            0.9,
            Predicate::all([
                Predicate::WasNull(Field::EndDate),
                Predicate::IsPresent(Field::EndDate),
                Predicate::FieldUnchanged(Field::CompanyName),
            ]),
        ),
        RuleConfig::new(
            "company_removed",
            0.8,
            Predicate::all([was_present(Field::CompanyName), Predicate::IsNull(Field::CompanyName)]),
        ),
        RuleConfig::new(
            "ended_before_company_change",
            0.75,
            Predicate::all([
                Predicate::FieldChanged(Field::CompanyName),
                company_id_not_stable(),
                was_present(Field::CompanyName),
                was_present(Field::EndDate),
            ]),
        ),
        RuleConfig::new(
            "title_removed",
            0.7,
            Predicate::all([was_present(Field::Title), Predicate::IsNull(Field::Title)]),
        ),
    ]
}

fn promotion_rules() -> Vec<RuleConfig> {
    let [unchanged, present] = same_company();
    vec![
        RuleConfig::new(
            "title_level_increased",
            0.85,
            Predicate::all([
                Predicate::FieldChanged(Field::Title),
                unchanged.clone(),
                present.clone(),
                Predicate::LevelIncreased(Field::TitleLevel),
            ]),
        ),
        RuleConfig::new(
            "title_keyword_promotion",
            0.75,
            Predicate::all([
                Predicate::FieldChanged(Field::Title),
                unchanged.clone(),
                present.clone(),
                Predicate::title_matches(PROMOTION_KEYWORDS.iter().copied()),
            ]),
        ),
        RuleConfig::new(
            "org_layer_increased",
            0.7,
            Predicate::all([
                Predicate::FieldChanged(Field::Title),
                unchanged,
                present,
                Predicate::LevelIncreased(Field::OrgLayer),
            ]),
        ),
    ]
}

fn transfer_rules() -> Vec<RuleConfig> {
    let [unchanged, present] = same_company();
    vec![
        RuleConfig::new(
            "department_changed",
            0.75,
            Predicate::all([
                Predicate::FieldChanged(Field::Department),
                Predicate::IsPresent(Field::Department),
                unchanged.clone(),
                present.clone(),
            ]),
        ),
        RuleConfig::new(
            "lateral_title_change",
            0.7,
            Predicate::all([
                Predicate::FieldChanged(Field::Title),
                was_present(Field::Title),
                Predicate::IsPresent(Field::Title),
                Predicate::FieldUnchanged(Field::TitleLevel),
                unchanged,
                present,
            ]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_rules() {
        for (t, cfg) in default_movements() {
            assert!(!cfg.rules.is_empty(), "{t} has no rules");
            assert!(cfg.effective_enabled());
        }
    }

    #[test]
    fn test_promotion_modifier_waiver_names_a_rule() {
        let cfg = MovementTypeConfig::defaults_for(MovementType::Promotion);
        let modifier = cfg.effective_modifier();
        assert!(modifier.adjustment < 0.0);
        for name in &modifier.waived_by_rules {
            assert!(cfg.rules.iter().any(|r| &r.name == name));
        }
    }

    #[test]
    fn test_overlay_keeps_builtin_rules_when_none_given() {
        let mut base = MovementTypeConfig::defaults_for(MovementType::Hire);
        let rules = base.rules.len();
        base.overlay(&MovementTypeConfig {
            min_confidence: Some(0.9),
            ..Default::default()
        });
        assert_eq!(base.min_confidence, Some(0.9));
        assert_eq!(base.rules.len(), rules);
    }
}
