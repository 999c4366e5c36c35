//! Skip-or-rebuild decision

use crate::fingerprint::Fingerprint;
use serde::Serialize;
use std::fmt;

/// Why a rebuild is required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RebuildReason {
    /// No usable record from a previous build
    NoRecord,
    /// Inputs differ from the recorded build
    FingerprintChanged,
    /// Record matches but the artifact is gone
    ArtifactMissing,
    /// Caller asked to ignore the record
    Forced,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoRecord => "no previous build recorded",
            Self::FingerprintChanged => "inputs changed",
            Self::ArtifactMissing => "artifact missing",
            Self::Forced => "forced",
        };
        f.write_str(text)
    }
}

/// Gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "reason", rename_all = "kebab-case")]
pub enum Decision {
    Skip,
    Rebuild(RebuildReason),
}

/// Compare the computed fingerprint with the recorded one
///
/// Skips only when both match and the artifact is on disk.
pub fn decide(
    computed: &Fingerprint,
    recorded: Option<&Fingerprint>,
    artifact_present: bool,
) -> Decision {
    match recorded {
        None => Decision::Rebuild(RebuildReason::NoRecord),
        Some(recorded) if recorded != computed => {
            Decision::Rebuild(RebuildReason::FingerprintChanged)
        }
        Some(_) if !artifact_present => Decision::Rebuild(RebuildReason::ArtifactMissing),
        Some(_) => Decision::Skip,
    }
}
