//! Gated build pipeline
//!
//! Source check, fingerprint, gate, then either skip or run every step and
//! record the new fingerprint. The record is written only after the last
//! step succeeds.

use crate::cache::DigestStore;
use crate::discover::discover;
use crate::error::{display_relative, BuildError, BuildResult};
use crate::fallback::{check_sources, SourceCheck};
use crate::fingerprint::{compute_fingerprint, Fingerprint};
use crate::gate::{decide, Decision, RebuildReason};
use crate::plan::BundlePlan;
use crate::runner::{run_steps, StepRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What a pipeline run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// Sources absent; the prebuilt artifact was kept
    SourcesMissing { missing: Vec<PathBuf> },
    /// Inputs unchanged and artifact present; nothing ran
    UpToDate { fingerprint: Fingerprint },
    /// Every step ran and the record now holds `fingerprint`
    Rebuilt {
        fingerprint: Fingerprint,
        reason: RebuildReason,
        steps_run: usize,
        #[serde(skip)]
        elapsed: Duration,
    },
}

impl Outcome {
    /// Whether any toolchain step ran
    pub fn rebuilt(&self) -> bool {
        matches!(self, Self::Rebuilt { .. })
    }
}

/// Dry-run view of what `run` would do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum Status {
    /// Required roots are missing
    SourcesMissing {
        missing: Vec<PathBuf>,
        artifact_present: bool,
    },
    /// Inputs were fingerprinted and gated
    Checked {
        fingerprint: Fingerprint,
        recorded: Option<Fingerprint>,
        decision: Decision,
    },
}

/// Pipeline guarding one artifact
pub struct Pipeline<S, R> {
    plan: BundlePlan,
    store: S,
    runner: R,
    force: bool,
}

impl<S: DigestStore, R: StepRunner> Pipeline<S, R> {
    pub fn new(plan: BundlePlan, store: S, runner: R) -> Self {
        Self {
            plan,
            store,
            runner,
            force: false,
        }
    }

    /// Ignore the record and always rebuild when sources are present
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn plan(&self) -> &BundlePlan {
        &self.plan
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Discover inputs and compute their fingerprint
    pub fn fingerprint(&self) -> BuildResult<Fingerprint> {
        let entries = discover(&self.plan.project_root, &self.plan.input_spec())?;
        let fingerprint = compute_fingerprint(&entries);
        tracing::debug!(
            files = entries.len(),
            fingerprint = %fingerprint.short(12),
            "fingerprinted inputs"
        );
        Ok(fingerprint)
    }

    /// Report the gate decision without running steps or touching the record
    pub fn status(&self) -> BuildResult<Status> {
        match check_sources(&self.plan.required, &self.plan.artifact) {
            SourceCheck::Available => {}
            SourceCheck::KeepArtifact { missing } => {
                return Ok(Status::SourcesMissing {
                    missing,
                    artifact_present: true,
                })
            }
            SourceCheck::Unavailable { missing } => {
                return Ok(Status::SourcesMissing {
                    missing,
                    artifact_present: false,
                })
            }
        }

        let fingerprint = self.fingerprint()?;
        let recorded = self.store.load();
        let decision = if self.force {
            Decision::Rebuild(RebuildReason::Forced)
        } else {
            decide(&fingerprint, recorded.as_ref(), self.plan.artifact.is_file())
        };

        Ok(Status::Checked {
            fingerprint,
            recorded,
            decision,
        })
    }

    /// Run the gated build
    pub fn run(&mut self) -> BuildResult<Outcome> {
        let start = Instant::now();
        let name = self.plan.name.clone();

        match check_sources(&self.plan.required, &self.plan.artifact) {
            SourceCheck::Available => {}
            SourceCheck::KeepArtifact { missing } => {
                tracing::info!(
                    bundle = %name,
                    missing = %self.describe(&missing),
                    "sources missing; keeping prebuilt artifact"
                );
                return Ok(Outcome::SourcesMissing { missing });
            }
            SourceCheck::Unavailable { missing } => {
                tracing::error!(
                    bundle = %name,
                    artifact = %self.plan.artifact.display(),
                    "sources missing and no prebuilt artifact found"
                );
                return Err(BuildError::SourcesUnavailable {
                    missing,
                    artifact: self.plan.artifact.clone(),
                });
            }
        }

        let fingerprint = self.fingerprint()?;

        let decision = if self.force {
            Decision::Rebuild(RebuildReason::Forced)
        } else {
            let recorded = self.store.load();
            decide(&fingerprint, recorded.as_ref(), self.plan.artifact.is_file())
        };

        let reason = match decision {
            Decision::Skip => {
                tracing::info!(bundle = %name, "up to date; skipping");
                return Ok(Outcome::UpToDate { fingerprint });
            }
            Decision::Rebuild(reason) => reason,
        };

        tracing::info!(bundle = %name, %reason, "building");
        let steps_run = run_steps(&mut self.runner, &self.plan.steps)?;

        self.store.store(&fingerprint)?;
        tracing::info!(
            bundle = %name,
            fingerprint = %fingerprint.short(12),
            "updated in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        Ok(Outcome::Rebuilt {
            fingerprint,
            reason,
            steps_run,
            elapsed: start.elapsed(),
        })
    }

    /// Consume the pipeline, returning its store and runner
    pub fn into_parts(self) -> (S, R) {
        (self.store, self.runner)
    }

    fn describe(&self, paths: &[PathBuf]) -> String {
        paths
            .iter()
            .map(|p| display_relative(p, &self.plan.project_root))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
