//! Configuration system for Talent Flow.
//! TOML-based, layered resolution: CLI > env > project file > defaults.
//! Rules, weights, breakpoints, cooldown, and rate cap are all data.

pub mod contradiction_config;
pub mod fingerprint_config;
pub mod governance_config;
pub mod movement_config;
pub mod rule_config;
pub mod runner_config;
pub mod scoring_config;
pub mod selection_config;
pub mod storage_config;
pub mod talent_flow_config;
pub mod validation;

pub use contradiction_config::ContradictionConfig;
pub use fingerprint_config::{FingerprintConfig, FingerprintField};
pub use governance_config::GovernanceConfig;
pub use movement_config::{default_movements, ModifierConfig, MovementTypeConfig};
pub use rule_config::{Predicate, RecentWindow, RuleConfig};
pub use runner_config::RunnerConfig;
pub use scoring_config::{RecencyStep, ScoringConfig};
pub use selection_config::SelectionConfig;
pub use storage_config::{RetryConfig, StorageConfig};
pub use talent_flow_config::{CliOverrides, TalentFlowConfig};
