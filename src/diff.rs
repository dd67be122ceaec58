//! Diff collector: dumps uncommitted working-tree changes

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{DumpError, Result};
use crate::git::Repository;
use crate::output::{self, DIFF_BASE_NAME};
use crate::persona::Persona;
use crate::writer::{fence_for, push_preamble};

/// Heading above the diff body
pub const DIFF_HEADING: &str = "## 🔀 Uncommitted Changes";

/// Body written when the working tree is clean
pub const NO_CHANGES: &str = "No uncommitted changes detected.";

/// Working changes of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDiff {
    /// Unified diff text, possibly empty
    pub text: String,
}

impl WorkingDiff {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of files touched
    pub fn files_changed(&self) -> usize {
        self.text
            .lines()
            .filter(|l| l.starts_with("diff --git "))
            .count()
    }
}

/// Collects and renders working-tree diffs
pub struct DiffCollector {
    persona: Option<Persona>,
}

impl DiffCollector {
    pub fn new(persona: Option<Persona>) -> Self {
        Self { persona }
    }

    /// Uncommitted changes of the repository containing `root`.
    ///
    /// Changes to documents this tool wrote into `root` are left out.
    pub fn collect(&self, root: &Path) -> Result<WorkingDiff> {
        let repo = Repository::discover(root)
            .map_err(|e| DumpError::NotAVersionControlledProject(e.to_string()))?;

        let prefix = root
            .strip_prefix(repo.workdir())
            .unwrap_or(Path::new(""))
            .to_path_buf();
        let bases = [output::project_name(root), DIFF_BASE_NAME.to_string()];

        let text = repo.working_diff(|path| {
            path.parent() == Some(prefix.as_path())
                && path.file_name().is_some_and(|name| {
                    let name = name.to_string_lossy();
                    bases.iter().any(|b| output::is_artifact_name(b, &name))
                })
        })?;

        let diff = WorkingDiff { text };
        info!("collected diff touching {} files", diff.files_changed());
        Ok(diff)
    }

    /// Build the diff document
    pub fn render(&self, diff: &WorkingDiff) -> String {
        let mut doc = String::new();
        push_preamble(&mut doc, self.persona);

        doc.push_str(DIFF_HEADING);
        doc.push_str("\n\n");

        if diff.is_empty() {
            doc.push_str(NO_CHANGES);
            doc.push('\n');
            return doc;
        }

        let body = diff.text.trim_end();
        let fence = fence_for(body);
        doc.push_str(&fence);
        doc.push_str("diff\n");
        doc.push_str(body);
        doc.push('\n');
        doc.push_str(&fence);
        doc.push('\n');
        doc
    }

    /// Collect, render and persist under a collision-free name in `root`
    pub fn write(&self, root: &Path) -> Result<(PathBuf, WorkingDiff)> {
        let diff = self.collect(root)?;
        let doc = self.render(&diff);
        let path = output::write_new(root, DIFF_BASE_NAME, &doc)?;
        Ok((path, diff))
    }
}
