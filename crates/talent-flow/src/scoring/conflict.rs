//! Conflicting movement types at the same employer.
//!
//! A person cannot be promoted and transferred (or exit and be hired) at one
//! company in one transition. With a company change every accepted type is a
//! distinct fact and all of them are kept.

use talent_flow_core::types::{MovementType, PersonState};

use super::evaluator::ScoredMovement;

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub kept: Vec<ScoredMovement>,
    pub dropped: Vec<ScoredMovement>,
    /// Types tied on raw weight at the top, winner first. Empty when the
    /// winner was unambiguous.
    pub tied: Vec<MovementType>,
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        self.tied.len() > 1
    }
}

/// Same employer on both sides: both company names present and equal
/// after trimming and case folding.
pub fn same_employer(old: &PersonState, new: &PersonState) -> bool {
    fn key(state: &PersonState) -> Option<String> {
        state
            .company_name
            .as_deref()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
    }
    matches!((key(old), key(new)), (Some(a), Some(b)) if a == b)
}

/// Keep one movement when the employer is unchanged: highest raw weight,
/// then `exit > promotion > transfer > hire`.
pub fn resolve_conflicts(accepted: Vec<ScoredMovement>, same_employer: bool) -> Resolution {
    if !same_employer || accepted.len() < 2 {
        return Resolution {
            kept: accepted,
            dropped: Vec::new(),
            tied: Vec::new(),
        };
    }

    let mut ranked = accepted;
    ranked.sort_by(|a, b| {
        b.raw_weight()
            .total_cmp(&a.raw_weight())
            .then_with(|| {
                a.movement_type()
                    .tie_break_rank()
                    .cmp(&b.movement_type().tie_break_rank())
            })
    });

    let top = ranked[0].raw_weight();
    let tied: Vec<MovementType> = ranked
        .iter()
        .take_while(|m| m.raw_weight() == top)
        .map(ScoredMovement::movement_type)
        .collect();

    let dropped = ranked.split_off(1);
    Resolution {
        kept: ranked,
        dropped,
        tied: if tied.len() > 1 { tied } else { Vec::new() },
    }
}
