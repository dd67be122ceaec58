/*!
 * Filter engine: allow-list, exclusions, binary detection and reading
 */

use std::fs;
use std::io;
use std::path::Path;

use glob_match::glob_match;
use tracing::{debug, warn};

use crate::config::FilterConfig;
use crate::types::{CandidateFile, FileContent, IncludedFile, Provenance, ReadWarning};

/// Bytes inspected by the binary sniff
const SNIFF_LEN: usize = 8192;

/// Share of control bytes above which a sample counts as binary
const MAX_CONTROL_RATIO: f32 = 0.1;

/// Result of filtering a candidate set
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Files that made it into the dump, sorted by path
    pub included: Vec<IncludedFile>,
    /// Files that matched the rules but could not be read
    pub warnings: Vec<ReadWarning>,
    /// Candidates rejected by name or location
    pub rejected: usize,
}

impl FilterOutcome {
    pub fn text_count(&self) -> usize {
        self.included
            .iter()
            .filter(|f| matches!(f.content, FileContent::Text(_)))
            .count()
    }

    pub fn binary_count(&self) -> usize {
        self.included.iter().filter(|f| f.is_binary()).count()
    }

    /// Included files found outside the repository index
    pub fn untracked_count(&self) -> usize {
        self.included
            .iter()
            .filter(|f| f.provenance == Provenance::UntrackedButScanned)
            .count()
    }

    pub fn oversized_count(&self) -> usize {
        self.included
            .iter()
            .filter(|f| matches!(f.content, FileContent::TooLarge))
            .count()
    }
}

/// Applies a [`FilterConfig`] to candidate files
#[derive(Debug, Clone)]
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Directory names that prune whole subtrees
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.config.excluded_dirs.iter().any(|d| d == name)
    }

    /// Check if a candidate is excluded by name, location or deny glob
    pub fn is_excluded(&self, file: &CandidateFile) -> bool {
        let name = file.file_name();

        if self.config.excluded_names.iter().any(|n| n == name) {
            return true;
        }

        if file.dir_components().any(|d| self.is_excluded_dir(d)) {
            return true;
        }

        self.config
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, name) || glob_match(p, &file.path))
    }

    /// Check if a candidate matches the allow-list
    pub fn is_allowed(&self, file: &CandidateFile) -> bool {
        let name = file.file_name();
        self.config
            .include_patterns
            .iter()
            .any(|p| glob_match(p, name) || glob_match(p, &file.path))
    }

    /// Name rules only; no I/O
    pub fn admits(&self, file: &CandidateFile) -> bool {
        !self.is_excluded(file) && self.is_allowed(file)
    }

    /// Filter `candidates` and read every admitted file under `root`.
    pub fn apply(&self, root: &Path, candidates: &[CandidateFile]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for candidate in candidates {
            if !self.admits(candidate) {
                debug!("rejected {}", candidate.path);
                outcome.rejected += 1;
                continue;
            }

            match self.load(root, candidate) {
                Ok(file) => outcome.included.push(file),
                Err(warning) => {
                    warn!("skipping {}", warning);
                    outcome.warnings.push(warning);
                }
            }
        }

        outcome.included.sort_by(|a, b| a.path.cmp(&b.path));
        outcome.included.dedup_by(|a, b| a.path == b.path);
        outcome.warnings.sort_by(|a, b| a.path.cmp(&b.path));
        outcome
    }

    /// Read one file, classifying it as text, binary or oversized
    fn load(&self, root: &Path, candidate: &CandidateFile) -> Result<IncludedFile, ReadWarning> {
        let abs_path = candidate.absolute(root);
        let to_warning = |e: io::Error| ReadWarning {
            path: candidate.path.clone(),
            reason: describe_io_error(&e),
        };

        let metadata = fs::metadata(&abs_path).map_err(to_warning)?;
        if !metadata.is_file() {
            return Err(ReadWarning {
                path: candidate.path.clone(),
                reason: "not a regular file".to_string(),
            });
        }
        let size = metadata.len();

        let content = match self.config.max_file_size {
            Some(limit) if size > limit => FileContent::TooLarge,
            _ => classify(fs::read(&abs_path).map_err(to_warning)?),
        };

        Ok(IncludedFile {
            path: candidate.path.clone(),
            provenance: candidate.provenance,
            size,
            content,
        })
    }
}

/// Decide whether raw bytes are embeddable text
pub fn classify(bytes: Vec<u8>) -> FileContent {
    if looks_binary(&bytes[..bytes.len().min(SNIFF_LEN)]) {
        return FileContent::Binary;
    }
    match String::from_utf8(bytes) {
        Ok(text) => FileContent::Text(text),
        Err(_) => FileContent::Binary,
    }
}

/// Null bytes or a high share of control characters mark a sample as binary
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    let control = sample
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32))
        .count();
    control as f32 / sample.len() as f32 >= MAX_CONTROL_RATIO
}

fn describe_io_error(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => "vanished before it could be read".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => e.to_string(),
    }
}
