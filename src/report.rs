/*!
 * Reporting functionality for promptdump
 *
 * A run ends with one human-readable line on stdout; the calling layer shows
 * it as an informational notification.
 */

use std::fmt;
use std::path::PathBuf;

use crate::scanner::ScanSource;
use crate::types::ReadWarning;

/// Warnings named individually before the rest are only counted
const NAMED_WARNINGS: usize = 3;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpKind {
    /// Full project dump
    Codebase {
        /// How the file list was obtained
        source: ScanSource,
        /// Files embedded as text
        text_files: usize,
        /// Allow-listed files that failed the binary sniff
        binary_skipped: usize,
        /// Text files over the size cap
        oversized: usize,
        /// Candidates dropped by the name and location rules
        filtered_out: usize,
        /// Included files the repository does not track yet
        untracked: usize,
    },
    /// Working-tree diff
    Diff {
        /// Files touched by the diff
        files_changed: usize,
    },
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    /// Document written
    pub output_file: PathBuf,
    /// Pipeline-specific counts
    pub kind: DumpKind,
    /// Non-fatal per-file problems
    pub warnings: Vec<ReadWarning>,
}

impl DumpSummary {
    /// File name of the written document
    pub fn output_name(&self) -> String {
        self.output_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_file.display().to_string())
    }

    fn write_warnings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.warnings.is_empty() {
            return Ok(());
        }
        let named: Vec<String> = self
            .warnings
            .iter()
            .take(NAMED_WARNINGS)
            .map(|w| w.to_string())
            .collect();
        write!(f, "; ⚠️ unreadable: {}", named.join(", "))?;
        let rest = self.warnings.len().saturating_sub(NAMED_WARNINGS);
        if rest > 0 {
            write!(f, " and {} more", rest)?;
        }
        Ok(())
    }
}

impl fmt::Display for DumpSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DumpKind::Codebase {
                source,
                text_files,
                binary_skipped,
                oversized,
                filtered_out,
                untracked,
            } => {
                let source = match source {
                    ScanSource::VersionControl => "git",
                    ScanSource::Filesystem => "filesystem walk",
                };
                write!(
                    f,
                    "✅ Codebase dumped to: {} ({} {} included, {} binary skipped",
                    self.output_name(),
                    text_files,
                    plural(*text_files, "file", "files"),
                    binary_skipped
                )?;
                if *oversized > 0 {
                    write!(f, ", {} too large", oversized)?;
                }
                write!(
                    f,
                    ", {} unreadable, {} filtered out; via {}",
                    self.warnings.len(),
                    filtered_out,
                    source
                )?;
                if *untracked > 0 && source == "git" {
                    write!(f, ", {} untracked", untracked)?;
                }
                f.write_str(")")?;
            }
            DumpKind::Diff { files_changed: 0 } => {
                write!(
                    f,
                    "✅ Diff dumped to: {} (no uncommitted changes detected)",
                    self.output_name()
                )?;
            }
            DumpKind::Diff { files_changed } => {
                write!(
                    f,
                    "✅ Diff dumped to: {} ({} {} changed)",
                    self.output_name(),
                    files_changed,
                    plural(*files_changed, "file", "files")
                )?;
            }
        }
        self.write_warnings(f)
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
