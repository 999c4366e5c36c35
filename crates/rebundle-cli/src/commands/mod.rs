pub mod build;
pub mod clean;
pub mod hash;
pub mod status;

use anyhow::{Context, Result};
use rebundle_build::{BundlePlan, Pipeline, ProcessRunner, RecordFile};
use rebundle_config::{Config, ConfigLoader};
use std::path::{Path, PathBuf};

/// Shown after every failure, below the project hint
const GENERIC_HINT: &str = "If this persists, verify the toolchain is installed and try again.";

/// Load `rebundle.toml` from an explicit path or by searching upward
pub fn load_project(config: Option<&Path>, directory: Option<&Path>) -> Result<Config> {
    let loader = ConfigLoader::new();

    if let Some(path) = config {
        let path = match directory {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        };
        return loader
            .load_from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let start = match directory {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    loader
        .load_from_directory(&start)
        .with_context(|| format!("No project found from {}", start.display()))
}

/// Pipeline over the on-disk record and real processes
pub fn pipeline(project: &Config) -> Result<Pipeline<RecordFile, ProcessRunner>> {
    let plan = BundlePlan::from_config(project).context("Invalid project configuration")?;
    let record = RecordFile::new(&plan.record);
    Ok(Pipeline::new(plan, record, ProcessRunner::new()))
}

/// Log a failure with remediation hints
pub fn report_failure(err: &anyhow::Error, hint: Option<&str>) {
    tracing::error!("{err:#}");
    if let Some(hint) = hint {
        tracing::error!("{hint}");
    }
    tracing::error!("{GENERIC_HINT}");
}

/// Path relative to the project root when possible
pub fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Comma-separated relative paths
pub fn list_paths(paths: &[PathBuf], root: &Path) -> String {
    paths
        .iter()
        .map(|p| relative(p, root))
        .collect::<Vec<_>>()
        .join(", ")
}
