//! Tracing setup and trace-header correlation (shared by every binary).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Like [`init`], writing logs to stderr (for tools that print results on stdout).
pub fn init_to_stderr() {
    tracing::init_to_stderr();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Platform trace-header parsing.
pub mod trace;

pub use trace::{TRACE_ID_ENV, TraceId};
