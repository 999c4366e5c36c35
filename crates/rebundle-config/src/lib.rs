//! Rebundle configuration
//!
//! Describes one guarded artifact in a `rebundle.toml` file at the project
//! root:
//! - The artifact path and where its fingerprint record lives
//! - The input roots that feed the fingerprint
//! - The ordered toolchain steps that regenerate the artifact
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Project config (./rebundle.toml)
//! 2. Environment variables (REBUNDLE_*)
//! 3. CLI flags (handled by the caller)
//!
//! # Example
//!
//! ```no_run
//! use rebundle_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("guarding {}", config.project.bundle.artifact.display());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use loader::{Config, ConfigLoader};
pub use project::{
    BundleConfig, InputsConfig, ProjectConfig, StepConfig, CONFIG_FILE_NAME, DEFAULT_RECORD_NAME,
};
