//! Audit sinks backed by storage and by memory.

pub mod recording;
pub mod storage_sink;

pub use recording::RecordingAuditSink;
pub use storage_sink::StorageAuditSink;
