//! Which fields feed the state fingerprint, and how they are normalized.

use serde::{Deserialize, Serialize};

use crate::types::Field;

/// One fingerprinted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintField {
    pub field: Field,
    /// Lowercase the trimmed value before hashing.
    #[serde(default)]
    pub case_fold: bool,
}

impl FingerprintField {
    pub const fn new(field: Field, case_fold: bool) -> Self {
        Self { field, case_fold }
    }
}

/// Fingerprint configuration. An empty field list means the default set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FingerprintConfig {
    pub fields: Vec<FingerprintField>,
}

impl FingerprintConfig {
    /// Every tracked field; free-text fields are case-folded, identifiers are not.
    pub fn default_fields() -> Vec<FingerprintField> {
        Field::ALL
            .iter()
            .map(|&field| {
                let case_fold = matches!(
                    field,
                    Field::FullName
                        | Field::Title
                        | Field::CompanyName
                        | Field::Department
                        | Field::LinkedinUrl
                );
                FingerprintField::new(field, case_fold)
            })
            .collect()
    }

    pub fn effective_fields(&self) -> Vec<FingerprintField> {
        if self.fields.is_empty() {
            Self::default_fields()
        } else {
            self.fields.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_every_field() {
        let fields = FingerprintConfig::default().effective_fields();
        assert_eq!(fields.len(), Field::ALL.len());
        assert!(fields
            .iter()
            .any(|f| f.field == Field::CompanyId && !f.case_fold));
        assert!(fields.iter().any(|f| f.field == Field::Title && f.case_fold));
    }
}
