//! Candidate selection configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ACTIVE_WINDOW_DAYS, DEFAULT_MAX_CANDIDATES_PER_RUN};

/// Configuration for the candidate selector.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// A person is "active" if observed within this many days. Default: 30.
    pub active_window_days: Option<u32>,
    /// Upper bound on candidates per run; the rest are deferred. Default: 10000.
    pub max_candidates_per_run: Option<usize>,
}

impl SelectionConfig {
    pub fn effective_active_window_days(&self) -> u32 {
        self.active_window_days.unwrap_or(DEFAULT_ACTIVE_WINDOW_DAYS)
    }

    pub fn effective_max_candidates(&self) -> usize {
        self.max_candidates_per_run
            .unwrap_or(DEFAULT_MAX_CANDIDATES_PER_RUN)
    }
}
