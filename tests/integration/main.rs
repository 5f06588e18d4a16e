//! Integration tests for ringstage buffers and pipeline stages.
//!
//! Run with: `cargo test --test integration`

mod config;
mod pipeline;

use std::sync::Once;

/// Installs a test-writer tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `ringstage=debug` so eviction and
/// filter-dispatch events show up under `--nocapture`.
pub(crate) fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ringstage=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
