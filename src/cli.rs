//! Command-line interface definitions for dupescan.
//!
//! All arguments, subcommands and options live here, defined with the clap
//! derive API. Global options (verbosity, color, error format) apply to all
//! subcommands.
//!
//! # Example
//!
//! ```bash
//! # List duplicate groups under a directory
//! dupescan print ~/Downloads
//!
//! # Scan two roots, save the result for later
//! dupescan print ~/Downloads ~/Documents --cache scan.json
//!
//! # Unattended cleanup: keep copies under archive/, trash the rest
//! dupescan auto ~/data --prefer '/archive/' --dry-run
//!
//! # Review groups one by one
//! dupescan interactive ~/Downloads
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Duplicate file finder with staged content hashing.
///
/// dupescan groups files with byte-identical content (BLAKE3) and can list,
/// auto-clean or interactively clean the duplicates. Deletion defaults to
/// the system trash.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress and logging except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Also honors the NO_COLOR environment variable, set to any
    /// non-empty value.
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List duplicate groups without touching anything
    #[command(visible_alias = "p")]
    Print(PrintArgs),
    /// Delete duplicates unattended, driven by regex patterns
    #[command(visible_alias = "a")]
    Auto(AutoArgs),
    /// Review each group and choose which copies to keep
    #[command(visible_alias = "i")]
    Interactive(InteractiveArgs),
}

/// Arguments for the print subcommand.
#[derive(Debug, Args)]
pub struct PrintArgs {
    /// Directories to scan
    #[arg(value_name = "PATH", required_unless_present = "from_cache")]
    pub paths: Vec<PathBuf>,

    /// Write the group listing to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Listing format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Save the scan results for later reuse
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Reuse a saved scan instead of scanning
    #[arg(long, value_name = "FILE", conflicts_with_all = ["paths", "cache"])]
    pub from_cache: Option<PathBuf>,
}

/// Arguments for the auto subcommand.
#[derive(Debug, Args)]
pub struct AutoArgs {
    /// Directories to scan
    #[arg(value_name = "PATH", required_unless_present = "from_cache")]
    pub paths: Vec<PathBuf>,

    /// Regex marking the copies to keep (matched against the full path)
    #[arg(long, value_name = "REGEX", required = true)]
    pub prefer: String,

    /// Regex marking the copies to delete
    ///
    /// Only members matching this pattern are deleted, and only in groups
    /// that also contain a preferred copy.
    #[arg(long, value_name = "REGEX")]
    pub over: Option<String>,

    /// Delete the preferred side instead
    #[arg(long)]
    pub invert: bool,

    /// Log what would be deleted without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Permanently delete instead of moving to trash
    ///
    /// Warning: files cannot be recovered after permanent deletion.
    #[arg(long)]
    pub permanent: bool,

    /// Replace each deleted file with a symlink to the kept copy (Unix only)
    #[arg(long)]
    pub link: bool,

    /// Save the scan results for later reuse
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Reuse a saved scan instead of scanning
    #[arg(long, value_name = "FILE", conflicts_with_all = ["paths", "cache"])]
    pub from_cache: Option<PathBuf>,
}

/// Arguments for the interactive subcommand.
#[derive(Debug, Args)]
pub struct InteractiveArgs {
    /// Directory to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Log what would be deleted without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Permanently delete instead of moving to trash
    #[arg(long)]
    pub permanent: bool,
}

/// Output format for the group listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON array of groups for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_with_single_path() {
        let cli = Cli::try_parse_from(["dupescan", "print", "/tmp"]).unwrap();
        match cli.command {
            Commands::Print(args) => {
                assert_eq!(args.paths, vec![PathBuf::from("/tmp")]);
                assert_eq!(args.format, OutputFormat::Text);
                assert!(args.output.is_none());
            }
            _ => panic!("expected print subcommand"),
        }
    }

    #[test]
    fn test_print_alias_and_multiple_paths() {
        let cli = Cli::try_parse_from(["dupescan", "p", "/a", "/b"]).unwrap();
        match cli.command {
            Commands::Print(args) => assert_eq!(args.paths.len(), 2),
            _ => panic!("expected print subcommand"),
        }
    }

    #[test]
    fn test_print_requires_path_or_cache() {
        assert!(Cli::try_parse_from(["dupescan", "print"]).is_err());
        assert!(Cli::try_parse_from(["dupescan", "print", "--from-cache", "scan.json"]).is_ok());
    }

    #[test]
    fn test_print_from_cache_conflicts_with_paths() {
        assert!(
            Cli::try_parse_from(["dupescan", "print", "/tmp", "--from-cache", "scan.json"])
                .is_err()
        );
        assert!(Cli::try_parse_from([
            "dupescan",
            "print",
            "--cache",
            "a.json",
            "--from-cache",
            "b.json"
        ])
        .is_err());
    }

    #[test]
    fn test_print_json_format() {
        let cli =
            Cli::try_parse_from(["dupescan", "print", "/tmp", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Print(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected print subcommand"),
        }
    }

    #[test]
    fn test_auto_requires_prefer() {
        assert!(Cli::try_parse_from(["dupescan", "auto", "/tmp"]).is_err());
    }

    #[test]
    fn test_auto_full_flags() {
        let cli = Cli::try_parse_from([
            "dupescan",
            "auto",
            "/tmp",
            "--prefer",
            "/archive/",
            "--over",
            "/downloads/",
            "--invert",
            "--dry-run",
            "--permanent",
            "--link",
        ])
        .unwrap();
        match cli.command {
            Commands::Auto(args) => {
                assert_eq!(args.prefer, "/archive/");
                assert_eq!(args.over.as_deref(), Some("/downloads/"));
                assert!(args.invert);
                assert!(args.dry_run);
                assert!(args.permanent);
                assert!(args.link);
            }
            _ => panic!("expected auto subcommand"),
        }
    }

    #[test]
    fn test_auto_alias() {
        let cli =
            Cli::try_parse_from(["dupescan", "a", "/tmp", "--prefer", "keep"]).unwrap();
        assert!(matches!(cli.command, Commands::Auto(_)));
    }

    #[test]
    fn test_interactive_path_is_optional() {
        let cli = Cli::try_parse_from(["dupescan", "interactive"]).unwrap();
        match cli.command {
            Commands::Interactive(args) => assert!(args.path.is_none()),
            _ => panic!("expected interactive subcommand"),
        }

        let cli = Cli::try_parse_from(["dupescan", "i", "/tmp", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Interactive(args) => {
                assert_eq!(args.path, Some(PathBuf::from("/tmp")));
                assert!(args.dry_run);
            }
            _ => panic!("expected interactive subcommand"),
        }
    }

    #[test]
    fn test_verbose_quiet_conflict() {
        assert!(Cli::try_parse_from(["dupescan", "-v", "-q", "print", "/tmp"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dupescan", "print", "/tmp", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli =
            Cli::try_parse_from(["dupescan", "print", "/tmp", "--json-errors"]).unwrap();
        assert!(cli.json_errors);
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["dupescan", "explode"]).is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
