//! Rebundle build gate
//!
//! Decides whether an externally built artifact is stale and, if so,
//! rebuilds it:
//! - Source availability check with prebuilt-artifact fallback
//! - Input discovery over files and directory trees
//! - Deterministic SHA-256 fingerprinting of paths and contents
//! - Skip-or-rebuild gating against the last recorded fingerprint
//! - Fail-fast sequential execution of toolchain steps
//!
//! # Example
//!
//! ```no_run
//! use rebundle_build::{BundlePlan, Pipeline, ProcessRunner, RecordFile, ToolStep};
//!
//! let plan = BundlePlan::new(".", "dist/app.bundle.js")
//!     .with_root("package.json")
//!     .with_root("src")
//!     .with_step(ToolStep::new("bundle", "rolldown").with_args(["-c", "rolldown.config.mjs"]));
//! let record = RecordFile::new(&plan.record);
//!
//! let outcome = Pipeline::new(plan, record, ProcessRunner::new()).run()?;
//! println!("{outcome:?}");
//! # Ok::<(), rebundle_build::BuildError>(())
//! ```

pub mod cache;
pub mod discover;
pub mod error;
pub mod fallback;
pub mod fingerprint;
pub mod gate;
pub mod pipeline;
pub mod plan;
pub mod runner;

// Re-export main types
pub use cache::{DigestStore, MemoryStore, RecordFile};
pub use discover::{discover, FileEntry, RootSpec};
pub use error::{BuildError, BuildResult};
pub use fallback::{check_sources, SourceCheck};
pub use fingerprint::{compute_fingerprint, Fingerprint};
pub use gate::{decide, Decision, RebuildReason};
pub use pipeline::{Outcome, Pipeline, Status};
pub use plan::BundlePlan;
pub use runner::{run_steps, ProcessRunner, StepRunner, StepStatus, ToolStep};
