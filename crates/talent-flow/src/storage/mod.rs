//! SQLite persistence for Talent Flow: snapshots, movements, signals,
//! contradictions, governance state, audit log, run history.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod retention;
pub mod schema;
pub mod tables;

pub use engine::SqliteTalentFlowStore;
pub use migrations::migrate;
pub use pragmas::{configure_connection, configure_readonly_connection};
pub use retention::apply_retention;
pub use schema::TALENT_FLOW_TABLE_NAMES;
