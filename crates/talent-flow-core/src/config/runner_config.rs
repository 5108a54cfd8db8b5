//! Batch runner configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Worker threads. 0 = rayon default (one per core).
    pub threads: Option<usize>,
}

impl RunnerConfig {
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }
}
