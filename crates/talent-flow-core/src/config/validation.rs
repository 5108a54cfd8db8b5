//! Fail-fast validation of a fully resolved configuration.
//!
//! Every check here is an operator error: the engine refuses to start.

use std::collections::BTreeSet;

use super::rule_config::Predicate;
use super::talent_flow_config::TalentFlowConfig;
use crate::errors::ConfigError;
use crate::types::{ContradictionKind, DataSource, MovementType};

pub fn validate(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    validate_selection(config)?;
    validate_fingerprint(config)?;
    validate_scoring(config)?;
    validate_governance(config)?;
    validate_movements(config)?;
    validate_contradictions(config)?;
    validate_storage(config)?;
    Ok(())
}

fn unit_interval(field: impl Into<String>, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(ConfigError::invalid(
            field,
            format!("must be between 0.0 and 1.0, got {value}"),
        ));
    }
    Ok(())
}

fn positive(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be greater than 0"));
    }
    Ok(())
}

fn validate_selection(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    positive(
        "selection.active_window_days",
        config.selection.effective_active_window_days().into(),
    )?;
    positive(
        "selection.max_candidates_per_run",
        config.selection.effective_max_candidates() as u64,
    )
}

fn validate_fingerprint(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for f in &config.fingerprint.fields {
        if !seen.insert(f.field) {
            return Err(ConfigError::invalid(
                "fingerprint.fields",
                format!("duplicate field '{}'", f.field),
            ));
        }
    }
    Ok(())
}

fn validate_scoring(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    let scoring = &config.scoring;
    for (name, weight) in &scoring.source_weights {
        if DataSource::parse(name).is_none() {
            return Err(ConfigError::UnknownName {
                kind: "data source",
                name: name.clone(),
            });
        }
        if *weight <= 0.0 || *weight > 1.0 || weight.is_nan() {
            return Err(ConfigError::invalid(
                format!("scoring.source_weights.{name}"),
                format!("must be in (0.0, 1.0], got {weight}"),
            ));
        }
    }
    unit_interval(
        "scoring.unknown_source_weight",
        scoring.effective_unknown_source_weight(),
    )?;
    let steps = scoring.effective_recency();
    for step in &steps {
        unit_interval(
            format!("scoring.recency[{}d].multiplier", step.max_age_days),
            step.multiplier,
        )?;
    }
    // Stale data must never score higher than fresh data.
    for pair in steps.windows(2) {
        if pair[0].max_age_days == pair[1].max_age_days {
            return Err(ConfigError::invalid(
                "scoring.recency",
                format!("duplicate breakpoint at {} days", pair[0].max_age_days),
            ));
        }
        if pair[1].multiplier > pair[0].multiplier {
            return Err(ConfigError::invalid(
                "scoring.recency",
                format!(
                    "multiplier increases from {} to {} between {}d and {}d",
                    pair[0].multiplier,
                    pair[1].multiplier,
                    pair[0].max_age_days,
                    pair[1].max_age_days
                ),
            ));
        }
    }
    let recency_floor = scoring.effective_recency_floor();
    unit_interval("scoring.recency_floor", recency_floor)?;
    if let Some(last) = steps.last() {
        if recency_floor > last.multiplier {
            return Err(ConfigError::invalid(
                "scoring.recency_floor",
                "must not exceed the last breakpoint multiplier",
            ));
        }
    }
    unit_interval(
        "scoring.completeness_max_bonus",
        scoring.effective_completeness_max_bonus(),
    )?;
    let floor = scoring.effective_confidence_floor();
    let ceiling = scoring.effective_confidence_ceiling();
    unit_interval("scoring.confidence_floor", floor)?;
    unit_interval("scoring.confidence_ceiling", ceiling)?;
    if floor > ceiling {
        return Err(ConfigError::invalid(
            "scoring.confidence_floor",
            format!("floor {floor} exceeds ceiling {ceiling}"),
        ));
    }
    Ok(())
}

fn validate_governance(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    let gov = &config.governance;
    positive(
        "governance.evaluation_period_days",
        gov.effective_period_days().into(),
    )?;
    positive(
        "governance.max_movements_per_period",
        gov.effective_max_movements_per_period().into(),
    )
}

fn validate_movements(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    for name in config.movements.keys() {
        if MovementType::parse(name).is_none() {
            return Err(ConfigError::UnknownName {
                kind: "movement type",
                name: name.clone(),
            });
        }
    }
    for movement_type in MovementType::ALL {
        let cfg = config.effective_movement(movement_type);
        let prefix = format!("movements.{movement_type}");
        unit_interval(
            format!("{prefix}.min_confidence"),
            cfg.effective_min_confidence(),
        )?;
        if !cfg.effective_enabled() {
            continue;
        }
        if cfg.rules.is_empty() {
            return Err(ConfigError::invalid(
                format!("{prefix}.rules"),
                "an enabled movement type needs at least one rule",
            ));
        }
        let mut names = BTreeSet::new();
        for rule in &cfg.rules {
            if rule.name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("{prefix}.rules"),
                    "rule name must not be empty",
                ));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(ConfigError::invalid(
                    format!("{prefix}.rules"),
                    format!("duplicate rule name '{}'", rule.name),
                ));
            }
            unit_interval(format!("{prefix}.rules.{}.weight", rule.name), rule.weight)?;
            validate_predicate(&format!("{prefix}.rules.{}.when", rule.name), &rule.when)?;
        }
        let modifier = cfg.effective_modifier();
        if !(-1.0..=1.0).contains(&modifier.adjustment) {
            return Err(ConfigError::invalid(
                format!("{prefix}.modifier.adjustment"),
                "must be between -1.0 and 1.0",
            ));
        }
        for waiver in &modifier.waived_by_rules {
            if !names.contains(waiver.as_str()) {
                return Err(ConfigError::UnknownName {
                    kind: "rule",
                    name: format!("{prefix}.{waiver}"),
                });
            }
        }
    }
    Ok(())
}

fn validate_predicate(path: &str, predicate: &Predicate) -> Result<(), ConfigError> {
    let mut result = Ok(());
    predicate.walk(&mut |node| {
        if result.is_err() {
            return;
        }
        result = match node {
            Predicate::LevelIncreased(field) if !field.is_ordinal() => Err(ConfigError::invalid(
                path,
                format!("level_increased needs an ordinal field, got '{field}'"),
            )),
            Predicate::Recent(window) if !window.field.is_date() => Err(ConfigError::invalid(
                path,
                format!("recent needs a date field, got '{}'", window.field),
            )),
            Predicate::TitleMatches(keywords)
                if keywords.iter().all(|k| k.trim().is_empty()) =>
            {
                Err(ConfigError::invalid(path, "title_matches needs at least one keyword"))
            }
            Predicate::All(children) | Predicate::Any(children) if children.is_empty() => Err(
                ConfigError::invalid(path, "all/any needs at least one child predicate"),
            ),
            _ => Ok(()),
        };
    });
    result
}

fn validate_contradictions(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    let c = &config.contradictions;
    for name in c.severities.keys().chain(c.disabled.iter()) {
        if ContradictionKind::parse(name).is_none() {
            return Err(ConfigError::UnknownName {
                kind: "contradiction pattern",
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_storage(config: &TalentFlowConfig) -> Result<(), ConfigError> {
    let storage = &config.storage;
    positive(
        "storage.read_pool_size",
        storage.effective_read_pool_size() as u64,
    )?;
    positive(
        "storage.retry.max_attempts",
        storage.retry.effective_max_attempts().into(),
    )?;
    if storage.retry.effective_initial_backoff_ms() > storage.retry.effective_max_backoff_ms() {
        return Err(ConfigError::invalid(
            "storage.retry.initial_backoff_ms",
            "must not exceed max_backoff_ms",
        ));
    }
    Ok(())
}
