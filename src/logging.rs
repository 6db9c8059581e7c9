//! Tracing subscriber setup for the `gwt` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "GWT_LOG";

/// Filter used when `GWT_LOG` is unset
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Installs the global subscriber, writing plain lines without timestamps to stderr.
///
/// Calling this twice is harmless; the second subscriber is discarded.
pub fn init_logging(verbose: bool) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var(LOG_ENV).unwrap_or_else(|_| default_filter(verbose).into()),
    );
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
