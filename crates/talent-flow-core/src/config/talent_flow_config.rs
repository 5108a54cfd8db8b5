//! Top-level Talent Flow configuration with layered resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    ContradictionConfig, FingerprintConfig, GovernanceConfig, MovementTypeConfig, RunnerConfig,
    ScoringConfig, SelectionConfig, StorageConfig,
};
use crate::constants::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::errors::ConfigError;
use crate::types::MovementType;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`TALENT_FLOW_*`)
/// 3. Config file (`--config` path, or `talent_flow.toml` in the root)
/// 4. Compiled defaults
///
/// Every scalar is an `Option` so that a layer only overrides what it sets.
/// Read values through the `effective_*` accessors.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TalentFlowConfig {
    pub selection: SelectionConfig,
    pub fingerprint: FingerprintConfig,
    pub scoring: ScoringConfig,
    pub governance: GovernanceConfig,
    /// Per-type overrides keyed by movement type name. Merged over the built-ins.
    pub movements: BTreeMap<String, MovementTypeConfig>,
    pub contradictions: ContradictionConfig,
    pub storage: StorageConfig,
    pub runner: RunnerConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db_path: Option<String>,
    pub threads: Option<usize>,
    pub active_window_days: Option<u32>,
    pub max_candidates_per_run: Option<usize>,
    pub cooldown_days: Option<u32>,
    pub max_movements_per_period: Option<u32>,
}

impl TalentFlowConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit `config_path` must exist; the implicit `talent_flow.toml`
    /// in `root` is optional.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        Self::load_with_env(root, config_path, cli_overrides, |key| {
            std::env::var(key).ok()
        })
    }

    /// `load` with an injectable environment, so tests don't touch process state.
    pub fn load_with_env(
        root: &Path,
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: config file
        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let implicit: PathBuf = root.join(CONFIG_FILE_NAME);
                if implicit.exists() {
                    Self::merge_toml_file(&mut config, &implicit)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config, env)?;

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        super::validation::validate(self)
    }

    /// Built-in settings for `movement_type` with any configured override applied.
    pub fn effective_movement(&self, movement_type: MovementType) -> MovementTypeConfig {
        let mut resolved = MovementTypeConfig::defaults_for(movement_type);
        if let Some(over) = self.movements.get(movement_type.as_str()) {
            resolved.overlay(over);
        }
        resolved
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut TalentFlowConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: TalentFlowConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`: `Some` scalars, non-empty lists, and map
    /// entries in `other` win.
    pub fn merge(base: &mut TalentFlowConfig, other: &TalentFlowConfig) {
        // Selection
        if other.selection.active_window_days.is_some() {
            base.selection.active_window_days = other.selection.active_window_days;
        }
        if other.selection.max_candidates_per_run.is_some() {
            base.selection.max_candidates_per_run = other.selection.max_candidates_per_run;
        }

        // Fingerprint
        if !other.fingerprint.fields.is_empty() {
            base.fingerprint.fields = other.fingerprint.fields.clone();
        }

        // Scoring
        base.scoring.source_weights.extend(
            other
                .scoring
                .source_weights
                .iter()
                .map(|(k, v)| (k.clone(), *v)),
        );
        if other.scoring.unknown_source_weight.is_some() {
            base.scoring.unknown_source_weight = other.scoring.unknown_source_weight;
        }
        if !other.scoring.recency.is_empty() {
            base.scoring.recency = other.scoring.recency.clone();
        }
        if other.scoring.recency_floor.is_some() {
            base.scoring.recency_floor = other.scoring.recency_floor;
        }
        if other.scoring.completeness_max_bonus.is_some() {
            base.scoring.completeness_max_bonus = other.scoring.completeness_max_bonus;
        }
        if other.scoring.confidence_floor.is_some() {
            base.scoring.confidence_floor = other.scoring.confidence_floor;
        }
        if other.scoring.confidence_ceiling.is_some() {
            base.scoring.confidence_ceiling = other.scoring.confidence_ceiling;
        }

        // Governance
        if other.governance.evaluation_period_days.is_some() {
            base.governance.evaluation_period_days = other.governance.evaluation_period_days;
        }
        if other.governance.cooldown_periods.is_some() {
            base.governance.cooldown_periods = other.governance.cooldown_periods;
        }
        if other.governance.cooldown_days.is_some() {
            base.governance.cooldown_days = other.governance.cooldown_days;
        }
        if other.governance.max_movements_per_period.is_some() {
            base.governance.max_movements_per_period = other.governance.max_movements_per_period;
        }

        // Movements: per type, per field
        for (name, over) in &other.movements {
            base.movements.entry(name.clone()).or_default().overlay(over);
        }

        // Contradictions
        if other.contradictions.enabled.is_some() {
            base.contradictions.enabled = other.contradictions.enabled;
        }
        base.contradictions.severities.extend(
            other
                .contradictions
                .severities
                .iter()
                .map(|(k, v)| (k.clone(), *v)),
        );
        if !other.contradictions.disabled.is_empty() {
            base.contradictions.disabled = other.contradictions.disabled.clone();
        }

        // Storage
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }
        if other.storage.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = other.storage.busy_timeout_ms;
        }
        if other.storage.audit_retention_days.is_some() {
            base.storage.audit_retention_days = other.storage.audit_retention_days;
        }
        if other.storage.run_retention_days.is_some() {
            base.storage.run_retention_days = other.storage.run_retention_days;
        }
        if other.storage.persist_audit.is_some() {
            base.storage.persist_audit = other.storage.persist_audit;
        }
        if other.storage.retry.max_attempts.is_some() {
            base.storage.retry.max_attempts = other.storage.retry.max_attempts;
        }
        if other.storage.retry.initial_backoff_ms.is_some() {
            base.storage.retry.initial_backoff_ms = other.storage.retry.initial_backoff_ms;
        }
        if other.storage.retry.max_backoff_ms.is_some() {
            base.storage.retry.max_backoff_ms = other.storage.retry.max_backoff_ms;
        }

        // Runner
        if other.runner.threads.is_some() {
            base.runner.threads = other.runner.threads;
        }
    }

    /// Apply `TALENT_FLOW_*` environment overrides. Unparseable values are
    /// a validation failure, not silently dropped.
    fn apply_env_overrides(
        config: &mut TalentFlowConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        fn parsed<T: std::str::FromStr>(
            env: &impl Fn(&str) -> Option<String>,
            suffix: &str,
        ) -> Result<Option<T>, ConfigError> {
            let key = format!("{ENV_PREFIX}{suffix}");
            match env(&key) {
                None => Ok(None),
                Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                    ConfigError::invalid(key, format!("cannot parse '{raw}'"))
                }),
            }
        }

        if let Some(v) = env(&format!("{ENV_PREFIX}DB_PATH")) {
            config.storage.db_path = Some(v);
        }
        if let Some(v) = parsed(&env, "THREADS")? {
            config.runner.threads = Some(v);
        }
        if let Some(v) = parsed(&env, "ACTIVE_WINDOW_DAYS")? {
            config.selection.active_window_days = Some(v);
        }
        if let Some(v) = parsed(&env, "MAX_CANDIDATES_PER_RUN")? {
            config.selection.max_candidates_per_run = Some(v);
        }
        if let Some(v) = parsed(&env, "EVALUATION_PERIOD_DAYS")? {
            config.governance.evaluation_period_days = Some(v);
        }
        if let Some(v) = parsed(&env, "COOLDOWN_DAYS")? {
            config.governance.cooldown_days = Some(v);
        }
        if let Some(v) = parsed(&env, "MAX_MOVEMENTS_PER_PERIOD")? {
            config.governance.max_movements_per_period = Some(v);
        }
        if let Some(v) = parsed(&env, "RETRY_MAX_ATTEMPTS")? {
            config.storage.retry.max_attempts = Some(v);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut TalentFlowConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.db_path {
            config.storage.db_path = Some(v.clone());
        }
        if let Some(v) = cli.threads {
            config.runner.threads = Some(v);
        }
        if let Some(v) = cli.active_window_days {
            config.selection.active_window_days = Some(v);
        }
        if let Some(v) = cli.max_candidates_per_run {
            config.selection.max_candidates_per_run = Some(v);
        }
        if let Some(v) = cli.cooldown_days {
            config.governance.cooldown_days = Some(v);
        }
        if let Some(v) = cli.max_movements_per_period {
            config.governance.max_movements_per_period = Some(v);
        }
    }
}
