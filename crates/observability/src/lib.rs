//! Process-wide tracing/logging setup.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops, which lets
/// every black-box test call it without coordination.
pub fn init() {
    tracing::init();
}
