//! Safety governor: ordered hard-stop guards plus the advisory
//! contradiction observer.

pub mod contradiction;
pub mod governor;
pub mod period;

pub use contradiction::{ContradictionDetector, Transition};
pub use governor::{Admission, SafetyGovernor};
pub use period::period_key;
