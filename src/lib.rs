/*!
 * promptdump - Dump a project into one prompt-ready document for LLMs
 *
 * This library collects the text files that make up a project (or its
 * uncommitted changes), renders them with a directory tree into a single
 * deterministic text file, and optionally prefixes task instructions.
 *
 * The library has no front-end dependencies; `main.rs` is a thin command-line
 * wrapper around [`run`].
 */

pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod git;
pub mod output;
pub mod persona;
pub mod report;
pub mod scanner;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


use tracing::info;

// Re-export main components for easier access
pub use config::{Args, Config, FilterConfig, Mode};
pub use diff::DiffCollector;
pub use error::{DumpError, Result};
pub use filter::FilterEngine;
pub use persona::Persona;
pub use report::{DumpKind, DumpSummary};
pub use scanner::{ScanSource, Scanner};
pub use tree::render_tree;
pub use types::{CandidateFile, FileContent, IncludedFile, Provenance, ReadWarning};
pub use writer::DumpWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the pipeline selected by `config.mode`
pub fn run(config: &Config) -> Result<DumpSummary> {
    match config.mode {
        Mode::DumpCodebase => dump_codebase(config),
        Mode::DumpDiff => dump_diff(config),
    }
}

/// Scan, filter and dump the project's files
pub fn dump_codebase(config: &Config) -> Result<DumpSummary> {
    let root = config.project_root()?;
    info!("dumping codebase at {}", root.display());

    let scan = Scanner::new(root.clone(), config).scan()?;
    let outcome = FilterEngine::new(config.filter.clone()).apply(&root, &scan.candidates);
    info!(
        "{} of {} candidates included",
        outcome.included.len(),
        scan.candidates.len()
    );

    let output_file = DumpWriter::new(config.persona).write(&root, &outcome.included)?;

    let mut warnings = scan.warnings;
    warnings.extend(outcome.warnings.iter().cloned());

    Ok(DumpSummary {
        output_file,
        kind: DumpKind::Codebase {
            source: scan.source,
            text_files: outcome.text_count(),
            binary_skipped: outcome.binary_count(),
            oversized: outcome.oversized_count(),
            filtered_out: outcome.rejected,
            untracked: outcome.untracked_count(),
        },
        warnings,
    })
}

/// Dump the project's uncommitted working-tree changes
pub fn dump_diff(config: &Config) -> Result<DumpSummary> {
    let root = config.project_root()?;
    info!("dumping working diff at {}", root.display());

    let (output_file, diff) = DiffCollector::new(config.persona).write(&root)?;

    Ok(DumpSummary {
        output_file,
        kind: DumpKind::Diff {
            files_changed: diff.files_changed(),
        },
        warnings: Vec::new(),
    })
}
