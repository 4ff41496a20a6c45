//! crates/logging/src/subscriber.rs
//! Subscriber installation for binaries.

use super::config::{LOG_ENV_VAR, VerbosityConfig};
use tracing_subscriber::EnvFilter;

/// Builds the filter for `config`, preferring [`LOG_ENV_VAR`] when it holds a
/// valid directive.
#[must_use]
pub fn build_filter(config: VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
}

/// Installs a `fmt` subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed, which
/// happens when tests or embedding applications initialise tracing first.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing};
///
/// init_tracing(VerbosityConfig::from_verbose_level(2));
/// tracing::debug!(target: "scp::protocol", "visible at -vv");
/// ```
pub fn init_tracing(config: VerbosityConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr)
        .with_target(config.level() >= 2)
        .try_init()
        .is_ok()
}
