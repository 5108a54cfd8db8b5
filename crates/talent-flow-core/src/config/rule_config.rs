//! Movement rules as data: a named, weighted predicate tree.
//!
//! Predicates are a closed tagged union parsed once at startup. In TOML:
//!
//! ```toml
//! [[movements.hire.rules]]
//! name = "company_changed_with_title"
//! weight = 0.9
//! when = { all = [ { field_changed = "company_name" }, { is_present = "title" } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Field;

/// A boolean predicate over `(old, new, changed_fields)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The field is in the changed set.
    FieldChanged(Field),
    /// The field is not in the changed set.
    FieldUnchanged(Field),
    /// Ordinal field (`title_level` / `org_layer`) is higher on the new side.
    LevelIncreased(Field),
    /// New title contains a keyword the old title lacked (case-insensitive).
    TitleMatches(Vec<String>),
    /// Field was absent on the old side.
    WasNull(Field),
    /// Field is absent on the new side.
    IsNull(Field),
    /// Field is present on the new side.
    IsPresent(Field),
    /// New-side date field falls within `days` before the evaluation time.
    Recent(RecentWindow),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentWindow {
    pub field: Field,
    pub days: u32,
}

impl Predicate {
    pub fn all(preds: impl IntoIterator<Item = Predicate>) -> Self {
        Self::All(preds.into_iter().collect())
    }

    pub fn any(preds: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Any(preds.into_iter().collect())
    }

    pub fn not(pred: Predicate) -> Self {
        Self::Not(Box::new(pred))
    }

    pub fn title_matches<S: Into<String>>(keywords: impl IntoIterator<Item = S>) -> Self {
        Self::TitleMatches(keywords.into_iter().map(Into::into).collect())
    }

    /// Whether this tree contains a `title_matches` leaf.
    pub fn uses_keywords(&self) -> bool {
        match self {
            Self::TitleMatches(_) => true,
            Self::All(children) | Self::Any(children) => children.iter().any(Self::uses_keywords),
            Self::Not(inner) => inner.uses_keywords(),
            _ => false,
        }
    }

    /// Visit every node depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Predicate)) {
        visit(self);
        match self {
            Self::All(children) | Self::Any(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
            Self::Not(inner) => inner.walk(visit),
            _ => {}
        }
    }
}

/// One named evidence path for a movement type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    /// Contribution in [0,1] when the predicate holds.
    pub weight: f64,
    pub when: Predicate,
}

impl RuleConfig {
    pub fn new(name: impl Into<String>, weight: f64, when: Predicate) -> Self {
        Self {
            name: name.into(),
            weight,
            when,
        }
    }
}
