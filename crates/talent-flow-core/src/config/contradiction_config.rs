//! Contradiction observer configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ContradictionKind, Severity};

/// Pattern names are validated against `ContradictionKind` at load time.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ContradictionConfig {
    /// Master switch. Default: true.
    pub enabled: Option<bool>,
    /// Severity overrides keyed by pattern name.
    pub severities: BTreeMap<String, Severity>,
    /// Pattern names to skip.
    pub disabled: Vec<String>,
}

impl ContradictionConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn is_enabled(&self, kind: ContradictionKind) -> bool {
        self.effective_enabled() && !self.disabled.iter().any(|d| d == kind.as_str())
    }

    pub fn severity_of(&self, kind: ContradictionKind) -> Severity {
        self.severities
            .get(kind.as_str())
            .copied()
            .unwrap_or_else(|| kind.default_severity())
    }
}
