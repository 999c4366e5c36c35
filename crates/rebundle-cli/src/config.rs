//! CLI configuration via environment variables
//!
//! Per-invocation preferences that do not belong in `rebundle.toml`.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON output (REBUNDLE_JSON=1)
    pub default_json: bool,
    /// Disable colored output (REBUNDLE_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Log filter (REBUNDLE_LOG, falling back to RUST_LOG)
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: env::var("REBUNDLE_JSON")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            no_color: env::var("REBUNDLE_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            log_filter: env::var("REBUNDLE_LOG")
                .or_else(|_| env::var("RUST_LOG"))
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
