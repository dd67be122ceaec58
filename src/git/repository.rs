/*!
 * Git repository operations
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use git2::{
    DiffFormat, DiffOptions, ErrorCode, Repository as Git2Repository, Status, StatusOptions, Tree,
};

use super::error::{GitError, GitResult};

/// File mode of a submodule entry in the index
const GITLINK_MODE: u32 = 0o160000;

/// A file the repository considers part of the working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    /// Path relative to the repository working directory
    pub path: PathBuf,
    /// Present in the index (as opposed to untracked but not ignored)
    pub tracked: bool,
}

/// Git repository with a working directory
pub struct Repository {
    /// Inner git2 repository instance
    inner: Git2Repository,
    /// Canonical working directory
    workdir: PathBuf,
}

impl Repository {
    /// Open the repository that contains `path`
    pub fn discover(path: &Path) -> GitResult<Self> {
        let inner = Git2Repository::discover(path)
            .map_err(|_| GitError::NotARepository(path.to_path_buf()))?;
        let workdir = inner
            .workdir()
            .ok_or_else(|| GitError::Bare(inner.path().to_path_buf()))?;
        let workdir = fs::canonicalize(workdir)?;

        Ok(Self { inner, workdir })
    }

    /// Get path to the working directory
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// List tracked files plus untracked files that the repository's ignore
    /// rules do not exclude, sorted by path.
    pub fn list_files(&self) -> GitResult<Vec<TrackedEntry>> {
        let mut files: BTreeMap<PathBuf, bool> = BTreeMap::new();

        let index = self.inner.index().map_err(GitError::IndexError)?;
        for entry in index.iter() {
            if entry.mode & GITLINK_MODE == GITLINK_MODE {
                continue;
            }
            let path = String::from_utf8_lossy(&entry.path).into_owned();
            // Conflicted paths appear once per stage.
            files.insert(PathBuf::from(path), true);
        }

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self
            .inner
            .statuses(Some(&mut opts))
            .map_err(GitError::StatusError)?;
        for entry in statuses.iter() {
            if !entry.status().contains(Status::WT_NEW) {
                continue;
            }
            let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
            files.entry(PathBuf::from(path)).or_insert(false);
        }

        Ok(files
            .into_iter()
            .map(|(path, tracked)| TrackedEntry { path, tracked })
            .collect())
    }

    /// Patch text of every uncommitted change, staged or not, like
    /// `git diff HEAD`.
    ///
    /// Before the first commit there is nothing recorded to compare against,
    /// so the index stands in for HEAD. Deltas whose path satisfies `skip`
    /// are left out.
    pub fn working_diff<F>(&self, skip: F) -> GitResult<String>
    where
        F: Fn(&Path) -> bool,
    {
        let mut opts = DiffOptions::new();
        let diff = match self.head_tree()? {
            Some(tree) => self
                .inner
                .diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts)),
            None => self.inner.diff_index_to_workdir(None, Some(&mut opts)),
        }
        .map_err(GitError::DiffError)?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |delta, _hunk, line| {
            let path = delta.new_file().path().or_else(|| delta.old_file().path());
            if path.is_some_and(&skip) {
                return true;
            }
            if matches!(line.origin(), '+' | '-' | ' ') {
                text.push(line.origin());
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .map_err(GitError::DiffError)?;

        Ok(text)
    }

    /// Tree of the last commit, or `None` while HEAD is unborn
    fn head_tree(&self) -> GitResult<Option<Tree<'_>>> {
        match self.inner.head() {
            Ok(head) => head.peel_to_tree().map(Some).map_err(GitError::DiffError),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(GitError::DiffError(e)),
        }
    }
}
