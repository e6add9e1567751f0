//! Tracing and logging setup shared by binaries and tests that use the value types.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{ObservabilityConfig, init_with};

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    init_with(&ObservabilityConfig::from_env());
}
