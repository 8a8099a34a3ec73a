//! `interactive` subcommand: review each duplicate set and pick what to keep.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use bytesize::ByteSize;

use crate::actions::{delete_batch, validate_preserves_copy, BatchDeleteResult, DeleteConfig};
use crate::cli::InteractiveArgs;
use crate::duplicates::FinderError;
use crate::error::ExitCode;

use super::{scan_or_load, summary_exit_code, AppContext};

/// What the user chose for one duplicate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    /// Leave every copy in place.
    KeepAll,
    /// Keep the member at this zero-based index, delete the rest.
    Keep(usize),
}

pub fn run(args: &InteractiveArgs, ctx: &AppContext) -> Result<ExitCode> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(args, ctx, &mut stdin.lock(), &mut stdout.lock())
}

/// Same as [`run`] but over caller-supplied streams, so tests can script
/// the session with in-memory buffers.
fn run_with_io(
    args: &InteractiveArgs,
    ctx: &AppContext,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<ExitCode> {
    let root = match &args.path {
        Some(path) => path.clone(),
        None => prompt_root(input, output)?,
    };

    let (groups, summary) = scan_or_load(&[root], None, None, ctx)?;
    if groups.is_empty() {
        writeln!(output, "No duplicate files found.")?;
        return Ok(summary_exit_code(&groups, summary.as_ref()));
    }

    let delete_config = DeleteConfig {
        permanent: args.permanent,
        dry_run: args.dry_run,
    };
    let mut total = BatchDeleteResult::default();
    let count = groups.len();

    for (i, group) in groups.iter().enumerate() {
        if ctx.shutdown.is_shutdown_requested() {
            return Err(FinderError::Interrupted.into());
        }

        writeln!(output)?;
        writeln!(
            output,
            "Group {} of {}: {} each, {} reclaimable",
            i + 1,
            count,
            ByteSize(group.size),
            ByteSize(group.reclaimable_space())
        )?;
        for (n, path) in group.paths.iter().enumerate() {
            writeln!(output, "  [{}] {}", n + 1, path.display())?;
        }

        let keep = match prompt_choice(input, output, group.len())? {
            Choice::KeepAll => continue,
            Choice::Keep(keep) => keep,
        };
        let victims: Vec<PathBuf> = group
            .paths
            .iter()
            .enumerate()
            .filter(|(n, _)| *n != keep)
            .map(|(_, p)| p.clone())
            .collect();
        validate_preserves_copy(&victims, group)?;
        total.absorb(delete_batch(&victims, group.size, &delete_config));
    }

    writeln!(output)?;
    if args.dry_run {
        writeln!(output, "[dry run] {}", total.summary())?;
    } else {
        writeln!(output, "{}", total.summary())?;
    }

    let mut code = summary_exit_code(&groups, summary.as_ref());
    if !total.all_succeeded() {
        code = ExitCode::PartialSuccess;
    }
    Ok(code)
}

/// Asks for a scan root until the user names an existing directory.
fn prompt_root(input: &mut impl BufRead, output: &mut impl Write) -> Result<PathBuf> {
    loop {
        write!(output, "Directory to scan: ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No directory given");
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let path = PathBuf::from(trimmed);
        if path.is_dir() {
            return Ok(path);
        }
        writeln!(output, "{} is not a directory.", path.display())?;
    }
}

/// Asks what to keep in the current set. Empty input and `f` keep the
/// first member; `a` keeps everything; a number keeps that member.
/// End of input is treated as "keep everything".
fn prompt_choice(
    input: &mut impl BufRead,
    output: &mut impl Write,
    members: usize,
) -> Result<Choice> {
    loop {
        write!(output, "Keep [F]irst, [a]ll, or a number? ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Choice::KeepAll);
        }
        let trimmed = line.trim();
        match trimmed {
            "" | "f" | "F" => return Ok(Choice::Keep(0)),
            "a" | "A" => return Ok(Choice::KeepAll),
            _ => match trimmed.parse::<usize>() {
                Ok(n) if (1..=members).contains(&n) => return Ok(Choice::Keep(n - 1)),
                _ => writeln!(
                    output,
                    "Please answer f, a, or a number between 1 and {}.",
                    members
                )?,
            },
        }
    }
}
