//! Resolved build plan
//!
//! Turns a loaded `rebundle.toml` into absolute paths and ready-to-run steps.

use crate::discover::RootSpec;
use crate::error::{BuildError, BuildResult};
use crate::runner::ToolStep;
use rebundle_config::{Config, DEFAULT_RECORD_NAME};
use std::path::{Path, PathBuf};

/// Everything the pipeline needs to guard one artifact
#[derive(Debug, Clone)]
pub struct BundlePlan {
    /// Label used in log output
    pub name: String,
    /// Base for relative input paths in the fingerprint
    pub project_root: PathBuf,
    /// Fingerprint inputs
    pub inputs: RootSpec,
    /// Roots whose absence triggers the fallback policy
    pub required: Vec<PathBuf>,
    /// Artifact produced by the toolchain
    pub artifact: PathBuf,
    /// Fingerprint record location
    pub record: PathBuf,
    /// Toolchain steps in execution order
    pub steps: Vec<ToolStep>,
    /// Remediation hint for failures
    pub hint: Option<String>,
}

impl BundlePlan {
    /// Start a plan for `artifact` under `project_root`
    ///
    /// Relative paths given to the builder methods are resolved against the
    /// project root.
    pub fn new(project_root: impl Into<PathBuf>, artifact: impl AsRef<Path>) -> Self {
        let project_root = project_root.into();
        let artifact = resolve(&project_root, artifact.as_ref());
        let record = artifact
            .parent()
            .map(|dir| dir.join(DEFAULT_RECORD_NAME))
            .unwrap_or_else(|| project_root.join(DEFAULT_RECORD_NAME));
        let name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bundle".to_string());

        Self {
            name,
            project_root,
            inputs: RootSpec::default(),
            required: Vec::new(),
            artifact,
            record,
            steps: Vec::new(),
            hint: None,
        }
    }

    /// Build a plan from loaded configuration
    pub fn from_config(config: &Config) -> BuildResult<Self> {
        config.project.validate()?;

        let project_root = absolute(&config.project_root)?;
        let project = &config.project;

        let mut plan = Self::new(&project_root, absolute(&config.artifact_path())?)
            .with_name(project.display_name())
            .with_record(absolute(&config.record_path())?)
            .with_exclude_hidden(project.inputs.exclude_hidden);

        for root in &project.inputs.roots {
            plan = plan.with_root(root);
        }
        plan.required = project
            .required_roots()
            .iter()
            .map(|root| resolve(&project_root, root))
            .collect();

        for step_config in &project.steps {
            let mut step = ToolStep::new(&step_config.name, &step_config.program)
                .with_args(step_config.args.iter().cloned());
            if let Some(launcher) = &project.bundle.launcher {
                step = step.launched_via(launcher);
            }
            step.cwd = Some(match &step_config.cwd {
                Some(cwd) => resolve(&project_root, cwd),
                None => project_root.clone(),
            });
            plan.steps.push(step);
        }

        plan.hint = project.bundle.hint.clone();
        Ok(plan)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an input root; it is also required unless listed otherwise later
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = resolve(&self.project_root, root.as_ref());
        self.required.push(root.clone());
        self.inputs.roots.push(root);
        self
    }

    /// Add an input root that may be absent without triggering the fallback
    pub fn with_optional_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = resolve(&self.project_root, root.as_ref());
        self.inputs.roots.push(root);
        self
    }

    pub fn with_record(mut self, record: impl AsRef<Path>) -> Self {
        self.record = resolve(&self.project_root, record.as_ref());
        self
    }

    pub fn with_exclude_hidden(mut self, exclude_hidden: bool) -> Self {
        self.inputs.exclude_hidden = exclude_hidden;
        self
    }

    pub fn with_step(mut self, step: ToolStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Fingerprint inputs with the artifact and record left out
    ///
    /// Either may sit inside an input root; hashing them would change the
    /// inputs on every build.
    pub fn input_spec(&self) -> RootSpec {
        self.inputs
            .clone()
            .excluding(&self.artifact)
            .excluding(&self.record)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn absolute(path: &Path) -> BuildResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| BuildError::io(path, e))?;
    Ok(cwd.join(path))
}
