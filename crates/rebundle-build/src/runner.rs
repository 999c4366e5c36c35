//! Toolchain step execution
//!
//! Steps are opaque external processes. They run one at a time with
//! inherited stdout/stderr, and the first failure stops the sequence.

use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

/// One external toolchain invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStep {
    /// Step name
    pub name: String,
    /// Program to execute
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Working directory (inherits the caller's when unset)
    pub cwd: Option<PathBuf>,
}

impl ToolStep {
    /// Create a step with no arguments
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Set arguments
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set working directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Run this step through `launcher`, e.g. `npx tsc -p ...`
    ///
    /// On Windows a bare launcher name gets the `.cmd` shim suffix.
    pub fn launched_via(mut self, launcher: &str) -> Self {
        let program = std::mem::replace(&mut self.program, launcher_program(launcher));
        self.args.insert(0, program);
        self
    }

    /// Command line for log output
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn launcher_program(launcher: &str) -> String {
    if cfg!(windows) && !launcher.contains('.') {
        format!("{launcher}.cmd")
    } else {
        launcher.to_string()
    }
}

/// Exit status of a finished step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    code: Option<i32>,
}

impl StepStatus {
    /// Status with an exit code
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a process that ended without a code (e.g. killed by a signal)
    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to execute a step and report how it exited
pub trait StepRunner {
    fn run(&mut self, step: &ToolStep) -> BuildResult<StepStatus>;
}

impl<R: StepRunner + ?Sized> StepRunner for &mut R {
    fn run(&mut self, step: &ToolStep) -> BuildResult<StepStatus> {
        (**self).run(step)
    }
}

/// Runs steps as child processes, blocking until each exits
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl StepRunner for ProcessRunner {
    fn run(&mut self, step: &ToolStep) -> BuildResult<StepStatus> {
        let mut command = Command::new(&step.program);
        command
            .args(&step.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(cwd) = &step.cwd {
            command.current_dir(cwd);
        }

        let status = command.status().map_err(|e| BuildError::StepSpawn {
            step: step.name.clone(),
            error: e,
        })?;

        Ok(match status.code() {
            Some(code) => StepStatus::exited(code),
            None => StepStatus::terminated(),
        })
    }
}

/// Run `steps` in order, stopping at the first failure
///
/// Returns the number of steps that ran, all of which succeeded.
pub fn run_steps<R: StepRunner + ?Sized>(runner: &mut R, steps: &[ToolStep]) -> BuildResult<usize> {
    for (index, step) in steps.iter().enumerate() {
        tracing::info!(
            step = %step.name,
            "running [{}/{}]: {}",
            index + 1,
            steps.len(),
            step.command_line()
        );

        let start = Instant::now();
        let status = runner.run(step)?;

        if !status.success() {
            tracing::error!(step = %step.name, code = ?status.code(), "step failed");
            return Err(BuildError::step_failed(&step.name, status.code()));
        }

        tracing::debug!(
            step = %step.name,
            "completed in {:.2}s",
            start.elapsed().as_secs_f64()
        );
    }

    Ok(steps.len())
}
