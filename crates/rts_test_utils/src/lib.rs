//! # RTS Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Snapshot and event-log fixtures
//! - Scripted host that drives a controller tick by tick
//! - Determinism test harness
//! - Grid strategies and a reference shortest-path solver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod grids;

/// Re-export proptest for convenience.
pub use proptest;

/// Route `tracing` output through the test harness.
///
/// Filtered by `RUST_LOG`. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
