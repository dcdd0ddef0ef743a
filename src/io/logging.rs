//! Tracing subscriber setup for the command-line front end

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`
///
/// Falls back to [`default_directive`] when the environment gives no
/// usable filter. Returns `false` if a global subscriber was already set.
pub fn init_logging(verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
