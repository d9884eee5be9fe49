//! Diagnostic logging.
//!
//! User-facing messages are printed by [`crate::output`]; this module only
//! wires up `tracing` so the organizer's internal events can be inspected
//! on stderr.
//!
//! Priority: `RUST_LOG` > `--verbose` > default `warn`.

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor `--verbose` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Builds the filter for the given verbosity.
pub fn filter(verbose: bool) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();

    tracing::debug!(
        app = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "logging initialised"
    );
}
