/*!
 * Core types and data structures for promptdump
 */

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Where a candidate file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Provenance {
    /// Listed in the version-control index
    Tracked,
    /// Not tracked, but found by an untracked-file query or a filesystem walk
    UntrackedButScanned,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracked => write!(f, "tracked"),
            Self::UntrackedButScanned => write!(f, "untracked-but-scanned"),
        }
    }
}

/// A file the scanner believes belongs to the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path relative to the project root, `/`-separated, without `.` or `..`
    pub path: String,
    /// How the scanner found this file
    pub provenance: Provenance,
}

impl CandidateFile {
    /// Build a candidate from any relative path, normalizing it.
    ///
    /// Returns `None` for paths that are empty, absolute, or escape the root.
    pub fn new(path: impl AsRef<Path>, provenance: Provenance) -> Option<Self> {
        normalize_relative(path.as_ref()).map(|path| Self { path, provenance })
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory components, root first
    pub fn dir_components(&self) -> impl Iterator<Item = &str> {
        let mut parts: Vec<&str> = self.path.split('/').collect();
        parts.pop();
        parts.into_iter()
    }

    /// Absolute location under `root`
    pub fn absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}

/// What the dump embeds for an included file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Decoded UTF-8 text
    Text(String),
    /// Failed the binary sniff; never embedded
    Binary,
    /// Text over the configured size cap; never embedded
    TooLarge,
}

/// A candidate that survived filtering
#[derive(Debug, Clone)]
pub struct IncludedFile {
    /// Relative path
    pub path: String,
    /// Provenance carried over from the candidate
    pub provenance: Provenance,
    /// Size in bytes
    pub size: u64,
    /// Embedded content or a skip marker
    pub content: FileContent,
}

impl IncludedFile {
    pub fn is_binary(&self) -> bool {
        matches!(self.content, FileContent::Binary)
    }
}

/// A non-fatal problem reading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadWarning {
    /// Relative path of the file that was skipped
    pub path: String,
    /// Human-readable cause
    pub reason: String,
}

impl fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.reason)
    }
}

/// Normalize a relative path into `/`-joined form.
pub fn normalize_relative(path: &Path) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
