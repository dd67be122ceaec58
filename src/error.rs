//! Global error handling for promptdump
//!
//! Every failure that prevents a coherent document from being produced is a
//! `DumpError`. Per-file problems are not errors; they are collected as
//! [`ReadWarning`](crate::types::ReadWarning)s and reported in the summary.

use std::io;
use std::path::Path;
use thiserror::Error;

use crate::git::GitError;

/// Global error type for promptdump operations
#[derive(Error, Debug)]
pub enum DumpError {
    /// Target path missing or not a directory
    #[error("Invalid project root: {0}")]
    InvalidRoot(String),

    /// Diff mode requested outside a repository
    #[error("Not a version-controlled project: {0}")]
    NotAVersionControlledProject(String),

    /// Requested persona name is not recognized
    #[error("Unknown persona '{0}' (expected one of: {known})", known = crate::persona::Persona::known_names())]
    UnknownPersona(String),

    /// The output document could not be created
    #[error("Failed to write output: {0}")]
    OutputWrite(String),

    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DumpError {
    /// Process exit status the command-line front end reports for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidRoot(_) => 3,
            Self::NotAVersionControlledProject(_) => 4,
            Self::UnknownPersona(_) => 5,
            Self::OutputWrite(_) => 6,
            _ => 1,
        }
    }

    pub(crate) fn output_write(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::OutputWrite(format!("{}: {}", path.display(), err))
    }
}

/// Specialized Result type for promptdump operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Creates a DumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_fatal_kind() {
        assert_eq!(DumpError::InvalidRoot("x".into()).exit_code(), 3);
        assert_eq!(
            DumpError::NotAVersionControlledProject("x".into()).exit_code(),
            4
        );
        assert_eq!(DumpError::UnknownPersona("x".into()).exit_code(), 5);
        assert_eq!(DumpError::OutputWrite("x".into()).exit_code(), 6);
        assert_eq!(
            DumpError::Io(io::Error::new(io::ErrorKind::Other, "boom")).exit_code(),
            1
        );
    }

    #[test]
    fn unknown_persona_message_lists_known_names() {
        let msg = DumpError::UnknownPersona("pirate".into()).to_string();
        assert!(msg.contains("pirate"));
        assert!(msg.contains("rooreview"));
        assert!(msg.contains("feature_architect"));
    }

    fn fails_when_false(flag: bool) -> Result<()> {
        ensure!(flag, InvalidRoot, "flag was {}", flag);
        Ok(())
    }

    #[test]
    fn ensure_macro_builds_variant() {
        assert!(fails_when_false(true).is_ok());
        match fails_when_false(false) {
            Err(DumpError::InvalidRoot(msg)) => assert_eq!(msg, "flag was false"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
