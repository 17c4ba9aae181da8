//! Shared tracing/logging setup for console binaries and test harnesses.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! job of whatever hosts them.

/// Initialize process-wide tracing with settings from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(&tracing::LogSettings::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
