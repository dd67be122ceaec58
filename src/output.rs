/*!
 * Collision-free output naming and atomic persistence
 *
 * Documents are written to `<dir>/<base>.txt`, or `<dir>/<base> (N).txt` for
 * the smallest N whose name is free. Existing files are never overwritten:
 * the finished document is linked into place with a no-clobber persist, so a
 * name claimed by someone else between probe and write is simply skipped.
 */

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{DumpError, Result};

/// Base name used for diff documents
pub const DIFF_BASE_NAME: &str = "diff_dump";

/// Collision probes attempted before giving up
pub const MAX_PROBES: usize = 10_000;

/// Base name for codebase documents: the project directory's own name
pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "project".to_string())
}

/// File name for the `attempt`-th probe: `base.txt`, `base (1).txt`, ...
pub fn candidate_name(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!("{}.txt", base)
    } else {
        format!("{} ({}).txt", base, attempt)
    }
}

/// Whether `file_name` is a document this tool would have produced for `base`
pub fn is_artifact_name(base: &str, file_name: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".txt") else {
        return false;
    };
    if stem == base {
        return true;
    }
    stem.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix(" ("))
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Write `contents` as a new document in `dir` and return its path
pub fn write_new(dir: &Path, base: &str, contents: &str) -> Result<PathBuf> {
    write_new_with_limit(dir, base, contents, MAX_PROBES)
}

fn write_new_with_limit(dir: &Path, base: &str, contents: &str, limit: usize) -> Result<PathBuf> {
    let mut tmp = stage(dir, contents).map_err(|e| DumpError::output_write(dir, e))?;

    for attempt in 0..limit {
        let candidate = dir.join(candidate_name(base, attempt));
        if occupied(&candidate) {
            debug!("{} exists, probing next name", candidate.display());
            continue;
        }
        match claim(tmp, &candidate)? {
            Claim::Written => return Ok(candidate),
            Claim::Taken(file) => tmp = file,
        }
    }

    Err(exhausted(dir, base))
}

/// Outcome of linking the staged document to one candidate name
enum Claim {
    Written,
    /// Someone else created the name first; the staged file is handed back
    Taken(NamedTempFile),
}

fn claim(tmp: NamedTempFile, candidate: &Path) -> Result<Claim> {
    match tmp.persist_noclobber(candidate) {
        Ok(_) => {
            debug!("wrote {}", candidate.display());
            Ok(Claim::Written)
        }
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            debug!("{} claimed concurrently, probing next name", candidate.display());
            Ok(Claim::Taken(e.file))
        }
        Err(e) => Err(DumpError::output_write(candidate, e.error)),
    }
}

/// Write the full document to a hidden temporary file next to its final name
fn stage(dir: &Path, contents: &str) -> io::Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".promptdump-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))?;
    }

    Ok(tmp)
}

fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn exhausted(dir: &Path, base: &str) -> DumpError {
    crate::error!(
        OutputWrite,
        "no free name for '{}' in {} after {} attempts",
        base,
        dir.display(),
        MAX_PROBES
    )
}
