//! Input discovery
//!
//! Expands a root spec (files and directories) into the file entries that
//! feed the fingerprint. Directories are walked without a depth limit and
//! symbolic links inside them are never followed.

use crate::error::{BuildError, BuildResult};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A discovered input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Raw `/`-separated path relative to the project root
    key: Vec<u8>,
    /// Raw file contents
    pub contents: Vec<u8>,
}

impl FileEntry {
    /// Create an entry, normalizing `\` separators to `/`
    pub fn new(relative_path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            key: normalize_separators(&relative_path.into()).into_bytes(),
            contents: contents.into(),
        }
    }

    /// Create an entry from an already `/`-separated key, byte for byte
    pub fn from_key(key: impl Into<Vec<u8>>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            contents: contents.into(),
        }
    }

    /// Path bytes that identify this entry in the fingerprint
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Relative path for display; undecodable bytes become U+FFFD
    pub fn relative_path(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }
}

/// Ordered list of input roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSpec {
    /// Files or directories, kept in declaration order
    pub roots: Vec<PathBuf>,
    /// Skip dot-prefixed names below a directory root
    pub exclude_hidden: bool,
    /// Files never fingerprinted even when a root contains them
    pub exclude: Vec<PathBuf>,
}

impl RootSpec {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            exclude_hidden: false,
            exclude: Vec::new(),
        }
    }

    pub fn with_exclude_hidden(mut self, exclude_hidden: bool) -> Self {
        self.exclude_hidden = exclude_hidden;
        self
    }

    /// Leave `path` out of discovery
    pub fn excluding(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude.push(path.into());
        self
    }
}

/// Collect every file reachable from `spec`, keyed relative to `project_root`
///
/// A file reached through two overlapping roots is reported once. The
/// returned entries are sorted by raw path bytes.
pub fn discover(project_root: &Path, spec: &RootSpec) -> BuildResult<Vec<FileEntry>> {
    let mut files: BTreeMap<Vec<u8>, PathBuf> = BTreeMap::new();

    for root in &spec.roots {
        let metadata = fs::metadata(root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BuildError::RootNotFound(root.clone())
            } else {
                BuildError::io(root, e)
            }
        })?;

        if metadata.is_dir() {
            walk_directory(project_root, root, spec.exclude_hidden, &mut files)?;
        } else {
            files.insert(relative_key(project_root, root), root.clone());
        }
    }

    let excluded: BTreeSet<Vec<u8>> = spec
        .exclude
        .iter()
        .map(|path| relative_key(project_root, path))
        .collect();
    files.retain(|key, path| {
        let keep = !excluded.contains(key);
        if !keep {
            tracing::debug!(path = %path.display(), "excluded from inputs");
        }
        keep
    });

    tracing::debug!(count = files.len(), "discovered input files");

    files
        .into_iter()
        .map(|(key, path)| {
            let contents = fs::read(&path).map_err(|e| BuildError::io(&path, e))?;
            Ok(FileEntry { key, contents })
        })
        .collect()
}

fn walk_directory(
    project_root: &Path,
    root: &Path,
    exclude_hidden: bool,
    files: &mut BTreeMap<Vec<u8>, PathBuf>,
) -> BuildResult<()> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !(exclude_hidden && entry.depth() > 0 && is_hidden(entry)));

    for entry in walker {
        let entry = entry.map_err(|e| BuildError::walk(root, e))?;
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            tracing::warn!(path = %entry.path().display(), "skipping symlink");
            continue;
        }

        if file_type.is_file() {
            let path = entry.into_path();
            tracing::trace!(path = %path.display(), "input");
            files.insert(relative_key(project_root, &path), path);
        }
    }

    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

/// `/`-joined raw bytes of `path` relative to `project_root`
///
/// Names are kept byte for byte, so distinct files never share a key even
/// when they are not valid UTF-8. Paths outside the root keep their `..`
/// components.
pub fn relative_key(project_root: &Path, path: &Path) -> Vec<u8> {
    let relative = pathdiff::diff_paths(path, project_root).unwrap_or_else(|| path.to_path_buf());

    let mut key = Vec::new();
    let mut first = true;
    for component in relative.components() {
        let part = match component {
            Component::CurDir => continue,
            Component::ParentDir => OsStr::new(".."),
            Component::RootDir => OsStr::new(""),
            other => other.as_os_str(),
        };
        if !first {
            key.push(b'/');
        }
        first = false;
        key.extend_from_slice(part.as_encoded_bytes());
    }
    key
}

/// Replace Windows separators with `/`
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Which of `roots` do not exist on disk
pub fn missing_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .filter(|root| !root.exists())
        .cloned()
        .collect()
}
