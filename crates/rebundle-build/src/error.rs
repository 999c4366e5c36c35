/// Build gate error types
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "Required sources missing ({}) and no prebuilt artifact found at {artifact}",
        join_paths(.missing)
    )]
    SourcesUnavailable {
        missing: Vec<PathBuf>,
        artifact: PathBuf,
    },

    #[error("Input root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to walk {root}: {error}")]
    Walk {
        root: PathBuf,
        error: walkdir::Error,
    },

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to launch step '{step}': {error}")]
    StepSpawn {
        step: String,
        error: std::io::Error,
    },

    #[error("Step '{step}' failed: {}", describe_exit(.code))]
    StepFailed { step: String, code: Option<i32> },

    #[error("Configuration error: {0}")]
    Config(#[from] rebundle_config::ConfigError),
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create a walk error for the given root
    pub fn walk(root: impl Into<PathBuf>, error: walkdir::Error) -> Self {
        Self::Walk {
            root: root.into(),
            error,
        }
    }

    /// Create a step failure from an exit code (`None` when killed by a signal)
    pub fn step_failed(step: impl Into<String>, code: Option<i32>) -> Self {
        Self::StepFailed {
            step: step.into(),
            code,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated without an exit code".to_string(),
    }
}

/// Render a path for messages, relative to `base` when possible
pub(crate) fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}
