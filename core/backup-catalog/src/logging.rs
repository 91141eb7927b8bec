//! Logging utilities for the catalog engine
//!
//! The library only emits `tracing` events; these helpers install a
//! subscriber for binaries and tests that embed the engine.

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "backup_catalog=info";

/// Initialize logging with default settings
///
/// # Environment Variables
/// - `RUST_LOG` - Log level filter (default: `backup_catalog=info`)
#[cfg(feature = "logging")]
pub fn init() {
    init_with_level(DEFAULT_DIRECTIVE)
}

/// Initialize logging with a specific filter directive
///
/// # Arguments
/// * `directive` - `EnvFilter` directive, e.g. `debug` or `backup_catalog=trace`
///
/// Calling this twice is harmless; the second subscriber is ignored.
#[cfg(feature = "logging")]
pub fn init_with_level(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initialize logging for tests
///
/// Catalog decisions (accepted/skipped tables) are logged at `debug`.
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("backup_catalog=debug"))
        .with_test_writer()
        .try_init();
}

// Stub implementations when logging feature is disabled
#[cfg(not(feature = "logging"))]
pub fn init() {}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_directive: &str) {}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
