//! The 4 movement types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A classified employment transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Hire,
    Exit,
    Promotion,
    Transfer,
}

impl MovementType {
    pub const ALL: [MovementType; 4] = [
        MovementType::Hire,
        MovementType::Exit,
        MovementType::Promotion,
        MovementType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hire => "hire",
            Self::Exit => "exit",
            Self::Promotion => "promotion",
            Self::Transfer => "transfer",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }

    /// Precedence on an exact raw-weight tie between conflicting types.
    /// Lower rank wins: exit > promotion > transfer > hire.
    pub fn tie_break_rank(&self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::Promotion => 1,
            Self::Transfer => 2,
            Self::Hire => 3,
        }
    }

    /// Downstream signal type: `movement_<type>`.
    pub fn signal_type(&self) -> String {
        format!("{}{}", crate::constants::SIGNAL_TYPE_PREFIX, self.as_str())
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for t in MovementType::ALL {
            assert_eq!(MovementType::parse(t.as_str()), Some(t));
        }
        assert_eq!(MovementType::parse(" Hire "), Some(MovementType::Hire));
        assert_eq!(MovementType::parse("demotion"), None);
    }

    #[test]
    fn test_signal_type() {
        assert_eq!(MovementType::Hire.signal_type(), "movement_hire");
        assert_eq!(MovementType::Promotion.signal_type(), "movement_promotion");
    }

    #[test]
    fn test_tie_break_ranks_unique() {
        let mut ranks: Vec<u8> = MovementType::ALL.iter().map(|t| t.tie_break_rank()).collect();
        ranks.sort();
        ranks.dedup();
        assert_eq!(ranks.len(), 4);
    }
}
