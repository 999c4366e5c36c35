//! Source availability check
//!
//! Trimmed distributions may ship a prebuilt artifact without the sources
//! it was built from. When required roots are missing, an existing artifact
//! is kept as-is; without one there is nothing to fall back on.

use crate::discover::missing_roots;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of checking required roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum SourceCheck {
    /// Every required root exists
    Available,
    /// Roots are missing but a prebuilt artifact exists
    KeepArtifact { missing: Vec<PathBuf> },
    /// Roots are missing and there is no artifact
    Unavailable { missing: Vec<PathBuf> },
}

impl SourceCheck {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Check that every `required` root exists, consulting `artifact` only when
/// one does not
pub fn check_sources(required: &[PathBuf], artifact: &Path) -> SourceCheck {
    let missing = missing_roots(required);
    if missing.is_empty() {
        return SourceCheck::Available;
    }

    if artifact.is_file() {
        SourceCheck::KeepArtifact { missing }
    } else {
        SourceCheck::Unavailable { missing }
    }
}
