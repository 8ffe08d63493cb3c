//! Tracing subscriber installation.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the filter: `RUST_LOG` when set and valid, otherwise `directive`.
///
/// Falls back to `info` when `directive` itself does not parse.
#[must_use]
pub fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a global `fmt` subscriber filtered by [`build_filter`].
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing(directive: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(build_filter(directive))
        .with(fmt::layer().with_target(true))
        .try_init()
}
