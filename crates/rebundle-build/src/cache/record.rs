//! On-disk fingerprint record

use super::DigestStore;
use crate::error::{BuildError, BuildResult};
use crate::fingerprint::Fingerprint;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fingerprint record stored as a single line of hex text
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DigestStore for RecordFile {
    fn load(&self) -> Option<Fingerprint> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no fingerprint record");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable fingerprint record; treating as absent");
                return None;
            }
        };

        let parsed = Fingerprint::parse(&text);
        if parsed.is_none() {
            tracing::warn!(path = %self.path.display(), "malformed fingerprint record; treating as absent");
        }
        parsed
    }

    fn store(&mut self, fingerprint: &Fingerprint) -> BuildResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
            }
        }

        fs::write(&self.path, fingerprint.as_str()).map_err(|e| BuildError::io(&self.path, e))
    }

    fn clear(&mut self) -> BuildResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::io(&self.path, e)),
        }
    }
}
