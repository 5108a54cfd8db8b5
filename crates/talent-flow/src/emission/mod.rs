//! Signal derivation and the ordered Movement -> Signal -> Snapshot ->
//! Governance commit.

pub mod emitter;
pub mod retry;
pub mod signal;

pub use emitter::{CommitPlan, CommitReport, SignalEmitter};
pub use retry::with_retry;
pub use signal::{contradiction_id_for, derive_signal, movement_id_for, signal_id_for};
