/*!
 * Git repository handling functionality
 */

mod error;
mod repository;

pub use error::{GitError, GitResult};
pub use repository::{Repository, TrackedEntry};

use std::path::Path;

/// Open the repository containing `path`, if there is one.
///
/// Bare repositories and paths outside any repository yield `None`.
pub fn discover(path: &Path) -> Option<Repository> {
    match Repository::discover(path) {
        Ok(repo) => Some(repo),
        Err(e) => {
            tracing::debug!("no usable repository for {}: {}", path.display(), e);
            None
        }
    }
}
