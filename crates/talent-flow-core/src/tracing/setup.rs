//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV, LOG_JSON_ENV};

static INIT: Once = Once::new();

/// Initialize the Talent Flow tracing/logging system.
///
/// Reads `TALENT_FLOW_LOG` for per-module log levels.
/// Format: `TALENT_FLOW_LOG=talent_flow=debug,talent_flow::audit=warn`
///
/// Falls back to `talent_flow=info,talent_flow_core=info` if unset or invalid.
/// `TALENT_FLOW_LOG_JSON=1` switches output to JSON lines.
///
/// Idempotent. Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let json = log_format_is_json(std::env::var(LOG_JSON_ENV).ok().as_deref());
        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
        // Another subscriber (e.g. a test harness) may already be installed.
        let _ = result;
    });
}

/// Whether the `TALENT_FLOW_LOG_JSON` value asks for JSON output.
pub fn log_format_is_json(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
