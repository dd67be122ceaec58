/*!
 * Command-line interface for promptdump
 *
 * Success: exit status 0 and a one-line summary on stdout.
 * Failure: non-zero exit status and a one-line message on stderr.
 */

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use promptdump::config::{Args, Config};
use promptdump::error::DumpError;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "promptdump", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    setup_tracing(args.verbose);

    match run(args) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<promptdump::DumpSummary, DumpError> {
    // Persona is resolved before anything touches the filesystem
    let config = Config::from_args(args)?;
    config.validate()?;
    promptdump::run(&config)
}

/// Diagnostics go to stderr and are off unless RUST_LOG or --verbose asks
fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("promptdump=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
