//! Project Configuration (rebundle.toml)
//!
//! Handles the project-level description of a guarded artifact, stored in
//! `rebundle.toml` at the project root.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name searched for when locating a project
pub const CONFIG_FILE_NAME: &str = "rebundle.toml";

/// Record file name used when `bundle.record` is not set
pub const DEFAULT_RECORD_NAME: &str = ".bundle.hash";

/// Project configuration from rebundle.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// The guarded artifact
    pub bundle: BundleConfig,

    /// Fingerprint inputs
    pub inputs: InputsConfig,

    /// Toolchain steps, run in declaration order
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepConfig>,
}

/// Artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Label used in log output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Artifact produced by the toolchain
    pub artifact: PathBuf,

    /// Fingerprint record (default: `.bundle.hash` next to the artifact)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PathBuf>,

    /// Remediation hint printed when the build fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Program every step is launched through (e.g. "npx")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launcher: Option<String>,
}

/// Fingerprint input configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    /// Files and directories hashed into the fingerprint
    pub roots: Vec<PathBuf>,

    /// Roots that must exist for a build to be attempted (default: all roots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<PathBuf>>,

    /// Skip dot-prefixed entries while walking directories
    #[serde(default)]
    pub exclude_hidden: bool,
}

/// A single toolchain invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    /// Step name
    pub name: String,

    /// Program to execute
    pub program: String,

    /// Arguments, passed verbatim
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Working directory relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Parse and validate configuration text; `file` is only used in errors
    pub fn from_toml_str(content: &str, file: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: file.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bundle.artifact.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "bundle.artifact".to_string(),
                reason: "artifact path cannot be empty".to_string(),
            });
        }

        if let Some(launcher) = &self.bundle.launcher {
            if launcher.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "bundle.launcher".to_string(),
                    reason: "launcher cannot be blank".to_string(),
                });
            }
        }

        if self.inputs.roots.is_empty() {
            return Err(ConfigError::ValidationError(
                "inputs.roots must list at least one file or directory".to_string(),
            ));
        }

        if let Some(required) = &self.inputs.required {
            for path in required {
                if !self.inputs.roots.contains(path) {
                    return Err(ConfigError::InvalidValue {
                        field: "inputs.required".to_string(),
                        reason: format!("'{}' is not listed in inputs.roots", path.display()),
                    });
                }
            }
        }

        if self.steps.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[steps]] entry is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            validate_step(step)?;
            if !seen.insert(step.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "steps".to_string(),
                    reason: format!("duplicate step name '{}'", step.name),
                });
            }
        }

        Ok(())
    }

    /// Label for log output: `bundle.name`, else the artifact file name
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.bundle.name {
            return name.clone();
        }
        self.bundle
            .artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bundle".to_string())
    }

    /// Roots that must exist before a build is attempted
    pub fn required_roots(&self) -> &[PathBuf] {
        self.inputs.required.as_deref().unwrap_or(&self.inputs.roots)
    }

    /// Record path as configured, falling back to the artifact's directory
    pub fn record_path(&self) -> PathBuf {
        match &self.bundle.record {
            Some(record) => record.clone(),
            None => self
                .bundle
                .artifact
                .parent()
                .map(|dir| dir.join(DEFAULT_RECORD_NAME))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORD_NAME)),
        }
    }
}

fn validate_step(step: &StepConfig) -> ConfigResult<()> {
    if step.name.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "steps.name".to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }

    if step.program.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: format!("steps.{}.program", step.name),
            reason: "program cannot be empty".to_string(),
        });
    }

    Ok(())
}
