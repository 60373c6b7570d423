//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging at `level` unless `RUST_LOG` says otherwise.
///
/// # Environment Variables
/// - `RUST_LOG` - Log level filter (overrides `level`)
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initialize logging for tests
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
