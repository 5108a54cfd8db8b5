//! The set of comparison fields that differ between two states.

use std::collections::BTreeSet;

use talent_flow_core::types::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    fields: BTreeSet<Field>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    /// Field names, for audit payloads and movement metadata.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|f| f.as_str()).collect()
    }
}

impl FromIterator<Field> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
