//! Observability for Talent Flow.
//! `tracing` crate with `EnvFilter`, per-module log levels, optional JSON output.

pub mod setup;

pub use setup::{init_tracing, log_format_is_json};
