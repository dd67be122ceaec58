/*!
 * Error types for Git operations
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during Git operations
#[derive(Error, Debug)]
pub enum GitError {
    /// No repository contains the given path
    #[error("No Git repository found at or above {}", .0.display())]
    NotARepository(PathBuf),

    /// Repository has no working directory
    #[error("Repository at {} is bare", .0.display())]
    Bare(PathBuf),

    /// Error reading the index
    #[error("Failed to read index: {0}")]
    IndexError(git2::Error),

    /// Error querying working-tree status
    #[error("Failed to query status: {0}")]
    StatusError(git2::Error),

    /// Error computing a diff
    #[error("Failed to compute diff: {0}")]
    DiffError(git2::Error),

    /// IO error during Git operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Specialized Result type for Git operations
pub type GitResult<T> = Result<T, GitError>;
