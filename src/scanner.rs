/*!
 * Project scanning: decide which files belong to the project
 *
 * The version-control listing is authoritative when the root lives in a
 * repository. Otherwise the filesystem is walked, pruning noise directories
 * and (optionally) honoring `.gitignore` files.
 */

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::filter::FilterEngine;
use crate::git::{self, GitResult, Repository};
use crate::output::{self, DIFF_BASE_NAME};
use crate::types::{normalize_relative, CandidateFile, Provenance, ReadWarning};

/// Where the candidate list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSource {
    /// Tracked and unignored files reported by the repository
    VersionControl,
    /// Recursive directory walk
    Filesystem,
}

/// Scanner output
#[derive(Debug)]
pub struct ScanResult {
    /// How the list was obtained
    pub source: ScanSource,
    /// Candidates sorted by relative path
    pub candidates: Vec<CandidateFile>,
    /// Directories or entries that could not be traversed
    pub warnings: Vec<ReadWarning>,
}

/// Scanner for project files
pub struct Scanner {
    /// Canonical project root
    root: PathBuf,
    /// Used to prune excluded directories
    engine: FilterEngine,
    /// Base names of documents this tool writes into the root
    artifact_bases: Vec<String>,
    respect_gitignore: bool,
    use_vcs: bool,
}

impl Scanner {
    /// Create a scanner for an already validated, canonical `root`
    pub fn new(root: PathBuf, config: &Config) -> Self {
        let artifact_bases = vec![output::project_name(&root), DIFF_BASE_NAME.to_string()];
        Self {
            root,
            engine: FilterEngine::new(config.filter.clone()),
            artifact_bases,
            respect_gitignore: config.respect_gitignore,
            use_vcs: config.use_vcs,
        }
    }

    /// Produce the candidate files for the project
    pub fn scan(&self) -> Result<ScanResult> {
        ensure_dir(&self.root)?;

        if self.use_vcs {
            if let Some(repo) = git::discover(&self.root) {
                match self.scan_repository(&repo) {
                    Ok(candidates) => {
                        info!(
                            "listed {} candidates from repository at {}",
                            candidates.len(),
                            repo.workdir().display()
                        );
                        return Ok(ScanResult {
                            source: ScanSource::VersionControl,
                            candidates,
                            warnings: Vec::new(),
                        });
                    }
                    Err(e) => warn!("repository listing failed, walking instead: {}", e),
                }
            }
        }

        let (candidates, warnings) = if self.respect_gitignore {
            self.walk_with_ignore()
        } else {
            self.walk_plain()
        };
        info!(
            "walked {} candidates under {}",
            candidates.len(),
            self.root.display()
        );

        Ok(ScanResult {
            source: ScanSource::Filesystem,
            candidates,
            warnings,
        })
    }

    /// Candidates from the repository index and untracked-file status
    fn scan_repository(&self, repo: &Repository) -> GitResult<Vec<CandidateFile>> {
        let prefix = self.root.strip_prefix(repo.workdir()).unwrap_or(Path::new(""));

        let mut candidates = Vec::new();
        for entry in repo.list_files()? {
            let Ok(relative) = entry.path.strip_prefix(prefix) else {
                continue;
            };
            let provenance = if entry.tracked {
                Provenance::Tracked
            } else {
                Provenance::UntrackedButScanned
            };
            if let Some(candidate) = CandidateFile::new(relative, provenance) {
                self.keep(candidate, &mut candidates);
            }
        }

        Ok(finish(candidates))
    }

    /// Walk honoring .gitignore, .ignore and .git/info/exclude
    fn walk_with_ignore(&self) -> (Vec<CandidateFile>, Vec<ReadWarning>) {
        let excluded = self.engine.clone();

        let mut walker = WalkBuilder::new(&self.root);
        walker
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(false)
            .require_git(false)
            .follow_links(false)
            .filter_entry(move |e| {
                let is_dir = e.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir && excluded.is_excluded_dir(&e.file_name().to_string_lossy()))
            });

        let mut candidates = Vec::new();
        let mut warnings = Vec::new();
        for entry in walker.build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file())
                        || (entry.path_is_symlink() && entry.path().is_file());
                    if is_file {
                        self.keep_path(entry.path(), &mut candidates);
                    }
                }
                Err(e) => {
                    warn!("walk error: {}", e);
                    warnings.push(self.walk_warning(ignore_error_path(&e), &e));
                }
            }
        }

        (finish(candidates), warnings)
    }

    /// Walk without ignore-file support
    fn walk_plain(&self) -> (Vec<CandidateFile>, Vec<ReadWarning>) {
        let mut candidates = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && self
                        .engine
                        .is_excluded_dir(&e.file_name().to_string_lossy()))
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_file()
                        || (entry.path_is_symlink() && entry.path().is_file());
                    if is_file {
                        self.keep_path(entry.path(), &mut candidates);
                    }
                }
                Err(e) => {
                    warn!("walk error: {}", e);
                    warnings.push(self.walk_warning(e.path(), &e));
                }
            }
        }

        (finish(candidates), warnings)
    }

    /// Warning for an entry the walk could not traverse, named relative to
    /// the root when the failing path is known
    fn walk_warning(&self, path: Option<&Path>, err: &dyn std::fmt::Display) -> ReadWarning {
        let path = path
            .and_then(|p| p.strip_prefix(&self.root).ok())
            .and_then(normalize_relative)
            .unwrap_or_else(|| self.root.display().to_string());
        ReadWarning {
            path,
            reason: err.to_string(),
        }
    }

    fn keep_path(&self, abs_path: &Path, candidates: &mut Vec<CandidateFile>) {
        let candidate = abs_path
            .strip_prefix(&self.root)
            .ok()
            .and_then(|rel| CandidateFile::new(rel, Provenance::UntrackedButScanned));
        if let Some(candidate) = candidate {
            self.keep(candidate, candidates);
        }
    }

    /// Drop files inside excluded directories and our own earlier output
    fn keep(&self, candidate: CandidateFile, candidates: &mut Vec<CandidateFile>) {
        if candidate.dir_components().any(|d| self.engine.is_excluded_dir(d)) {
            return;
        }
        if self.is_artifact(&candidate) {
            debug!("skipping earlier dump {}", candidate.path);
            return;
        }
        candidates.push(candidate);
    }

    fn is_artifact(&self, candidate: &CandidateFile) -> bool {
        candidate.dir_components().next().is_none()
            && self
                .artifact_bases
                .iter()
                .any(|base| output::is_artifact_name(base, candidate.file_name()))
    }
}

fn ensure_dir(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root)
        .map_err(|e| crate::error!(InvalidRoot, "{}: {}", root.display(), e))?;
    crate::ensure!(
        metadata.is_dir(),
        InvalidRoot,
        "{} is not a directory",
        root.display()
    );
    Ok(())
}

/// Path of the entry an `ignore` walk error refers to
fn ignore_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            ignore_error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(ignore_error_path),
        _ => None,
    }
}

fn finish(mut candidates: Vec<CandidateFile>) -> Vec<CandidateFile> {
    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    candidates.dedup_by(|a, b| a.path == b.path);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use crate::error::DumpError;

    fn paths(result: &ScanResult) -> Vec<&str> {
        result.candidates.iter().map(|c| c.path.as_str()).collect()
    }

    fn canonical(dir: &tempfile::TempDir) -> PathBuf {
        fs::canonicalize(dir.path()).unwrap()
    }

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn fallback_walk_prunes_noise_and_honors_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical(&dir);
        write(&root, "a.py", "a");
        write(&root, "node_modules/lib.js", "x");
        write(&root, "venv/lib/site.py", "x");
        write(&root, "pkg/__pycache__/m.pyc", "x");
        write(&root, "pkg/m.py", "x");
        write(&root, "out.log", "x");
        write(&root, ".gitignore", "*.log\n");
        write(&root, ".git/config", "[core]\n");

        let mut config = Config::new(&root);
        config.use_vcs = false;
        let result = Scanner::new(root.clone(), &config).scan().unwrap();

        assert_eq!(result.source, ScanSource::Filesystem);
        assert_eq!(paths(&result), vec![".gitignore", "a.py", "pkg/m.py"]);
        assert!(result
            .candidates
            .iter()
            .all(|c| c.provenance == Provenance::UntrackedButScanned));
    }

    #[test]
    fn plain_walk_ignores_gitignore_but_prunes_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical(&dir);
        write(&root, "a.py", "a");
        write(&root, "out.log", "x");
        write(&root, ".gitignore", "*.log\n");
        write(&root, "dist/bundle.js", "x");

        let mut config = Config::new(&root);
        config.use_vcs = false;
        config.respect_gitignore = false;
        let result = Scanner::new(root.clone(), &config).scan().unwrap();

        assert_eq!(paths(&result), vec![".gitignore", "a.py", "out.log"]);
    }

    #[test]
    fn repository_listing_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical(&dir);
        let repo = git2::Repository::init(&root).unwrap();
        write(&root, "tracked.rs", "fn a() {}");
        write(&root, "untracked.rs", "fn b() {}");
        write(&root, "ignored.rs", "fn c() {}");
        write(&root, ".gitignore", "ignored.rs\n");
        write(&root, "node_modules/dep.js", "x");
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("tracked.rs")).unwrap();
        index.write().unwrap();

        let result = Scanner::new(root.clone(), &Config::new(&root)).scan().unwrap();

        assert_eq!(result.source, ScanSource::VersionControl);
        assert_eq!(paths(&result), vec![".gitignore", "tracked.rs", "untracked.rs"]);
        assert_eq!(result.candidates[1].provenance, Provenance::Tracked);
        assert_eq!(
            result.candidates[2].provenance,
            Provenance::UntrackedButScanned
        );
    }

    #[test]
    fn repository_listing_is_scoped_to_subdirectory_root() {
        let dir = tempfile::tempdir().unwrap();
        let top = canonical(&dir);
        git2::Repository::init(&top).unwrap();
        write(&top, "outside.py", "x");
        write(&top, "app/inner.py", "x");
        write(&top, "app/sub/deep.py", "x");

        let root = top.join("app");
        let result = Scanner::new(root.clone(), &Config::new(&root)).scan().unwrap();

        assert_eq!(result.source, ScanSource::VersionControl);
        assert_eq!(paths(&result), vec!["inner.py", "sub/deep.py"]);
    }

    #[test]
    fn earlier_dumps_are_not_rescanned() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical(&dir).join("Foo");
        write(&root, "a.py", "a");
        write(&root, "Foo.txt", "old dump");
        write(&root, "Foo (1).txt", "old dump");
        write(&root, "diff_dump.txt", "old diff");
        write(&root, "docs/Foo.txt", "a real doc");
        write(&root, "notes.txt", "keep");

        let mut config = Config::new(&root);
        config.use_vcs = false;
        let result = Scanner::new(root.clone(), &config).scan().unwrap();

        assert_eq!(paths(&result), vec!["a.py", "docs/Foo.txt", "notes.txt"]);
    }

    #[test]
    fn walk_errors_name_the_failing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical(&dir);
        let scanner = Scanner::new(root.clone(), &Config::new(&root));

        let err = ignore::Error::WithDepth {
            depth: 2,
            err: Box::new(ignore::Error::WithPath {
                path: root.join("pkg").join("locked"),
                err: Box::new(ignore::Error::Io(io::Error::from(
                    io::ErrorKind::PermissionDenied,
                ))),
            }),
        };
        let warning = scanner.walk_warning(ignore_error_path(&err), &err);
        assert_eq!(warning.path, "pkg/locked");
        assert_eq!(warning.reason, err.to_string());

        let bare = ignore::Error::Io(io::Error::from(io::ErrorKind::Other));
        assert_eq!(ignore_error_path(&bare), None);
        assert_eq!(
            scanner.walk_warning(ignore_error_path(&bare), &bare).path,
            root.display().to_string()
        );
    }

    #[test]
    fn empty_project_yields_no_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical(&dir);
        let mut config = Config::new(&root);
        config.use_vcs = false;
        let result = Scanner::new(root.clone(), &config).scan().unwrap();
        assert!(result.candidates.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_root_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("missing");
        let result = Scanner::new(root.clone(), &Config::new(&root)).scan();
        assert!(matches!(result, Err(DumpError::InvalidRoot(_))));
    }
}
