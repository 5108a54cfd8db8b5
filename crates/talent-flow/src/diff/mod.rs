//! State fingerprinting and change detection.

pub mod changes;
pub mod fingerprint;

pub use changes::ChangeSet;
pub use fingerprint::{has_changed, Fingerprinter, ABSENT_SENTINEL};
