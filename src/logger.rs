//! Logger setup shared by the server binary and the test fixtures.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter honors `RUST_LOG` when set; otherwise the given default level
/// is applied to this crate and `info` to everything else.
///
/// # Arguments
///
/// * `name` - Binary or fixture name used as the filter target
/// * `default_level` - Level applied when `RUST_LOG` is not set
pub fn setup_logger(name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,{}={level},roomrelay={level}",
            name.replace('-', "_"),
            level = default_level
        ))
    });

    // try_init: test binaries may call this more than once
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
