//! Tracing subscriber setup

use crate::config::Config;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr
///
/// Stdout is left to toolchain steps and JSON output. An unparsable filter
/// falls back to `info` with a warning.
pub fn init(config: &Config) {
    let mut rejected = None;
    let filter = match config.log_filter.as_deref() {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|error| {
            rejected = Some((directives, error));
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::new(DEFAULT_FILTER),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!config.no_color)
        .without_time()
        .init();

    if let Some((directives, error)) = rejected {
        tracing::warn!(
            filter = directives,
            %error,
            "ignoring invalid log filter; using '{DEFAULT_FILTER}'"
        );
    }
}
