//! `Classifier`: per-type ordered rule lists, max-weight aggregation.

use chrono::{DateTime, Utc};
use talent_flow_core::config::{RuleConfig, TalentFlowConfig};
use talent_flow_core::types::{MovementType, PersonState};

use super::predicate::PredicateContext;
use crate::diff::ChangeSet;

/// One movement type whose rules matched, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub movement_type: MovementType,
    /// Maximum weight among matching rules.
    pub raw_weight: f64,
    /// Every matching rule, in configured order.
    pub matched_rules: Vec<String>,
}

impl Classification {
    pub fn matched(&self, rule_name: &str) -> bool {
        self.matched_rules.iter().any(|r| r == rule_name)
    }
}

/// Rule sets for every enabled movement type, parsed once per run.
#[derive(Debug, Clone)]
pub struct Classifier {
    rule_sets: Vec<(MovementType, Vec<RuleConfig>)>,
}

impl Classifier {
    pub fn from_config(config: &TalentFlowConfig) -> Self {
        let rule_sets = MovementType::ALL
            .iter()
            .map(|&t| (t, config.effective_movement(t)))
            .filter(|(_, cfg)| cfg.effective_enabled())
            .map(|(t, cfg)| (t, cfg.rules))
            .collect();
        Self { rule_sets }
    }

    /// Movement types whose rules match this transition.
    ///
    /// Rules within a type are alternative evidence paths: the raw score is
    /// the maximum matching weight, never the sum. An empty change set
    /// returns immediately.
    pub fn classify(
        &self,
        old: &PersonState,
        new: &PersonState,
        changes: &ChangeSet,
        now: DateTime<Utc>,
    ) -> Vec<Classification> {
        if changes.is_empty() {
            return Vec::new();
        }
        let ctx = PredicateContext {
            old,
            new,
            changes,
            now,
        };

        let mut out = Vec::new();
        for (movement_type, rules) in &self.rule_sets {
            let mut raw_weight: Option<f64> = None;
            let mut matched_rules = Vec::new();
            for rule in rules {
                if ctx.evaluate(&rule.when) {
                    raw_weight = Some(raw_weight.map_or(rule.weight, |w| w.max(rule.weight)));
                    matched_rules.push(rule.name.clone());
                }
            }
            if let Some(raw_weight) = raw_weight {
                tracing::debug!(
                    person_id = %new.person_id,
                    movement_type = %movement_type,
                    raw_weight,
                    rules = ?matched_rules,
                    "rules matched"
                );
                out.push(Classification {
                    movement_type: *movement_type,
                    raw_weight,
                    matched_rules,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use talent_flow_core::config::FingerprintConfig;

    use super::*;
    use crate::diff::Fingerprinter;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn person(title: Option<&str>, company: Option<&str>) -> PersonState {
        let mut s = PersonState::new("p1", now());
        s.title = title.map(String::from);
        s.company_name = company.map(String::from);
        s.normalized()
    }

    fn classify(old: &PersonState, new: &PersonState) -> Vec<Classification> {
        let changes = Fingerprinter::new(&FingerprintConfig::default()).changed_fields(old, new);
        Classifier::from_config(&TalentFlowConfig::default()).classify(old, new, &changes, now())
    }

    fn types(found: &[Classification]) -> Vec<MovementType> {
        found.iter().map(|c| c.movement_type).collect()
    }

    #[test]
    fn test_no_changes_no_classification() {
        let s = person(Some("Engineer"), Some("Acme"));
        assert!(classify(&s, &s).is_empty());
    }

    #[test]
    fn test_hire_on_company_change_with_title() {
        let old = person(None, Some("Acme"));
        let new = person(Some("Engineer"), Some("NewCo"));
        let found = classify(&old, &new);
        assert_eq!(types(&found), vec![MovementType::Hire]);
        assert_eq!(found[0].raw_weight, 0.9);
        assert!(found[0].matched("company_changed_with_title"));
        assert!(found[0].matched("company_changed"));
    }

    #[test]
    fn test_exit_on_end_date_same_company() {
        let old = person(Some("Engineer"), Some("Acme"));
        let mut new = old.clone();
        new.end_date = NaiveDate::from_ymd_opt(2026, 6, 1);
        let found = classify(&old, &new);
        assert_eq!(types(&found), vec![MovementType::Exit]);
        assert_eq!(found[0].raw_weight, 0.9);
    }

    #[test]
    fn test_company_change_after_end_date_is_exit_and_hire() {
        let mut old = person(Some("Engineer"), Some("Acme"));
        old.end_date = NaiveDate::from_ymd_opt(2026, 5, 1);
        let mut new = person(Some("Engineer"), Some("NewCo"));
        new.start_date = NaiveDate::from_ymd_opt(2026, 6, 1);
        let found = classify(&old, &new);
        assert_eq!(types(&found), vec![MovementType::Hire, MovementType::Exit]);
    }

    #[test]
    fn test_promotion_on_level_increase() {
        let old = person(Some("Engineer"), Some("Acme"));
        let new = person(Some("Senior Engineer"), Some("Acme"));
        let found = classify(&old, &new);
        assert_eq!(types(&found), vec![MovementType::Promotion]);
        assert_eq!(found[0].raw_weight, 0.85);
        assert!(found[0].matched("title_keyword_promotion"));
    }

    #[test]
    fn test_org_layer_alone_is_not_a_promotion() {
        let mut old = person(Some("Engineer"), Some("Acme"));
        old.org_layer = Some(1);
        let mut new = old.clone();
        new.org_layer = Some(2);
        assert!(classify(&old, &new).is_empty());
    }

    #[test]
    fn test_org_layer_with_title_change_is_promotion() {
        let mut old = person(Some("Engineer"), Some("Acme"));
        old.org_layer = Some(1);
        let mut new = person(Some("Developer"), Some("Acme"));
        new.org_layer = Some(2);
        let found = classify(&old, &new);
        let promotion = found
            .iter()
            .find(|c| c.movement_type == MovementType::Promotion)
            .unwrap();
        assert!(promotion.matched("org_layer_increased"));
        assert_eq!(promotion.raw_weight, 0.7);
    }

    #[test]
    fn test_lateral_title_change_is_transfer() {
        let old = person(Some("Backend Engineer"), Some("Acme"));
        let new = person(Some("Data Engineer"), Some("Acme"));
        let found = classify(&old, &new);
        assert_eq!(types(&found), vec![MovementType::Transfer]);
    }

    #[test]
    fn test_department_change_is_transfer() {
        let mut old = person(Some("Engineer"), Some("Acme"));
        old.department = Some("Payments".into());
        let mut new = old.clone();
        new.department = Some("Risk".into());
        let found = classify(&old, &new);
        assert_eq!(types(&found), vec![MovementType::Transfer]);
        assert_eq!(found[0].raw_weight, 0.75);
    }

    #[test]
    fn test_rename_with_stable_company_id_is_no_movement() {
        let mut old = person(None, Some("Acme Corp"));
        old.company_id = Some("C1".into());
        let mut new = old.clone();
        new.company_name = Some("Acme Corporation".into());
        assert!(classify(&old, &new).is_empty());
    }

    #[test]
    fn test_company_change_with_new_id_is_hire() {
        let mut old = person(Some("Engineer"), Some("Acme"));
        old.company_id = Some("C1".into());
        let mut new = person(Some("Engineer"), Some("NewCo"));
        new.company_id = Some("C2".into());
        assert_eq!(types(&classify(&old, &new)), vec![MovementType::Hire]);
    }

    #[test]
    fn test_disabled_type_never_matches() {
        let config = TalentFlowConfig::from_toml(
            r#"
            [movements.transfer]
            enabled = false
            "#,
        )
        .unwrap();
        let old = person(Some("Backend Engineer"), Some("Acme"));
        let new = person(Some("Data Engineer"), Some("Acme"));
        let changes = Fingerprinter::new(&config.fingerprint).changed_fields(&old, &new);
        let found = Classifier::from_config(&config).classify(&old, &new, &changes, now());
        assert!(found.is_empty());
    }
}
