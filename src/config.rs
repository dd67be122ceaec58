/*!
 * Configuration handling for promptdump
 */

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::Result;
use crate::persona::Persona;
use crate::utils::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_NAMES, DEFAULT_INCLUDE};

/// Which pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Dump the project's text files with a directory tree
    #[default]
    DumpCodebase,
    /// Dump the uncommitted working-tree changes
    DumpDiff,
}

/// Command-line arguments for promptdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "promptdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dump a project's text files or uncommitted changes into one prompt-ready document",
    long_about = "Collects the files that make up a project (or its uncommitted changes), renders them with a directory tree into a single text file next to the project, and optionally prefixes task instructions for a Large Language Model."
)]
pub struct Args {
    /// Project directory to dump
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// What to dump
    #[clap(long, value_enum, default_value_t = Mode::default())]
    pub mode: Mode,

    /// Persona preamble to prefix (neutral, rooreview, rooreview_auditor,
    /// codebase_auditor, documentation_auditor, feature_architect,
    /// change_review, none)
    #[clap(long, conflicts_with = "no_prompt")]
    pub prompt: Option<String>,

    /// Do not prefix any persona preamble
    #[clap(long)]
    pub no_prompt: bool,

    /// Comma-separated list of extra file globs to include
    #[clap(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Comma-separated list of file globs to exclude
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Respect .gitignore files when walking the filesystem
    #[clap(long, default_value = "true", action = clap::ArgAction::Set)]
    pub respect_gitignore: bool,

    /// Ignore version-control metadata and always walk the filesystem
    #[clap(long)]
    pub no_vcs: bool,

    /// Omit content of text files larger than this many bytes
    #[clap(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Enable debug logging on stderr
    #[clap(short, long)]
    pub verbose: bool,
}

/// Inclusion and exclusion rules applied by the filter engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// Allow-list globs; a file must match at least one
    pub include_patterns: Vec<String>,

    /// Deny-list globs, matched against file name and relative path
    pub exclude_patterns: Vec<String>,

    /// Exact file names that are never dumped
    pub excluded_names: Vec<String>,

    /// Directory names whose subtrees are never dumped
    pub excluded_dirs: Vec<String>,

    /// Text files above this size keep a placeholder instead of content
    pub max_file_size: Option<u64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        fn owned(v: &[&str]) -> Vec<String> {
            v.iter().map(|s| s.to_string()).collect()
        }
        Self {
            include_patterns: owned(&DEFAULT_INCLUDE),
            exclude_patterns: Vec::new(),
            excluded_names: owned(&DEFAULT_EXCLUDED_NAMES),
            excluded_dirs: owned(&DEFAULT_EXCLUDED_DIRS),
            max_file_size: None,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project directory to dump
    pub target_dir: PathBuf,

    /// Which pipeline to run
    pub mode: Mode,

    /// Persona preamble, if any
    pub persona: Option<Persona>,

    /// File selection rules
    pub filter: FilterConfig,

    /// Whether the fallback walk honors .gitignore files
    pub respect_gitignore: bool,

    /// Whether to ask version control for the file list
    pub use_vcs: bool,
}

impl Config {
    /// Configuration for `target_dir` with every default applied
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            mode: Mode::default(),
            persona: None,
            filter: FilterConfig::default(),
            respect_gitignore: true,
            use_vcs: true,
        }
    }

    /// Create configuration from command-line arguments.
    ///
    /// The persona is resolved here so an unknown name fails before any
    /// filesystem work starts.
    pub fn from_args(args: Args) -> Result<Self> {
        let persona = if args.no_prompt {
            None
        } else {
            Persona::lookup(args.prompt.as_deref())?
        };

        let mut filter = FilterConfig::default();
        filter.include_patterns.extend(args.include);
        filter.exclude_patterns.extend(args.exclude);
        filter.max_file_size = args.max_file_size;

        Ok(Self {
            target_dir: PathBuf::from(args.directory_path),
            mode: args.mode,
            persona,
            filter,
            respect_gitignore: args.respect_gitignore,
            use_vcs: !args.no_vcs,
        })
    }

    /// Absolute, canonical project root.
    ///
    /// Fails with `InvalidRoot` if the target is missing or not a directory.
    pub fn project_root(&self) -> Result<PathBuf> {
        let root = fs::canonicalize(&self.target_dir).map_err(|e| {
            crate::error!(InvalidRoot, "{}: {}", self.target_dir.display(), e)
        })?;
        crate::ensure!(
            root.is_dir(),
            InvalidRoot,
            "{} is not a directory",
            self.target_dir.display()
        );
        Ok(root)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.project_root().map(|_| ())
    }
}
