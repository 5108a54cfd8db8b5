//! Deterministic blake3 fingerprint over a configured field list.
//!
//! Fields are hashed in name order, so the configured order never matters.
//! Values are trimmed (and case-folded where configured); an absent field
//! and an empty one hash to the same sentinel.

use talent_flow_core::config::{FingerprintConfig, FingerprintField};
use talent_flow_core::types::{Field, PersonState};

use super::changes::ChangeSet;

/// Stand-in for absent fields. An absent field is never an error.
pub const ABSENT_SENTINEL: &str = "";

const FIELD_SEP: u8 = 0x1f;
const RECORD_SEP: u8 = 0x1e;

/// Fingerprints states and computes changed-field sets. Built once per run.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    fields: Vec<FingerprintField>,
}

impl Fingerprinter {
    pub fn new(config: &FingerprintConfig) -> Self {
        let mut fields = config.effective_fields();
        fields.sort_by_key(|f| f.field.as_str());
        fields.dedup_by_key(|f| f.field);
        Self { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().map(|f| f.field)
    }

    /// Normalized comparison value of one field.
    fn normalized(&self, state: &PersonState, spec: &FingerprintField) -> String {
        match state.field_text(spec.field) {
            None => ABSENT_SENTINEL.to_string(),
            Some(raw) => {
                let trimmed = raw.trim();
                if spec.case_fold {
                    trimmed.to_lowercase()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }

    /// Hex-encoded blake3 hash of the normalized comparison fields.
    pub fn fingerprint(&self, state: &PersonState) -> String {
        let mut hasher = blake3::Hasher::new();
        for spec in &self.fields {
            hasher.update(spec.field.as_str().as_bytes());
            hasher.update(&[FIELD_SEP]);
            hasher.update(self.normalized(state, spec).as_bytes());
            hasher.update(&[RECORD_SEP]);
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Fields whose normalized values differ between `old` and `new`.
    pub fn changed_fields(&self, old: &PersonState, new: &PersonState) -> ChangeSet {
        self.fields
            .iter()
            .filter(|spec| self.normalized(old, spec) != self.normalized(new, spec))
            .map(|spec| spec.field)
            .collect()
    }
}

/// Simple inequality; kept as a named operation for the governor.
pub fn has_changed(old_hash: &str, new_hash: &str) -> bool {
    old_hash != new_hash
}
