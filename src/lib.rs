//! dupescan - Duplicate File Finder
//!
//! Finds duplicate files by content, in two hashing stages: files are
//! bucketed by size, candidates are screened by a 4 KiB prefix digest, and
//! only prefix collisions get a full BLAKE3 digest. Duplicate sets can be
//! printed, cleaned up automatically under a regex keep policy, or reviewed
//! interactively.

pub mod actions;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod signal;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::commands::AppContext;
use crate::error::ExitCode;

/// Runs the parsed command line to completion.
///
/// Returns the exit code the process should terminate with; fatal errors
/// are left to the caller to render.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color || cli.quiet {
        yansi::disable();
    }

    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        shutdown: signal::install_handler()?,
    };

    match &cli.command {
        Commands::Print(args) => commands::print::run(args, &ctx),
        Commands::Auto(args) => commands::auto::run(args, &ctx),
        Commands::Interactive(args) => commands::interactive::run(args, &ctx),
    }
}
