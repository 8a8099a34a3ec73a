//! `print` subcommand: report duplicate sets without touching any file.

use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use bytesize::ByteSize;
use yansi::Paint;

use crate::cli::{OutputFormat, PrintArgs};
use crate::duplicates::DuplicateGroup;
use crate::error::ExitCode;

use super::{scan_or_load, summary_exit_code, AppContext};

pub fn run(args: &PrintArgs, ctx: &AppContext) -> Result<ExitCode> {
    let (groups, summary) = scan_or_load(
        &args.paths,
        args.from_cache.as_deref(),
        args.cache.as_deref(),
        ctx,
    )?;

    // JSON output must stay machine-readable, so the human summary is
    // demoted to a log line in that mode.
    match args.format {
        OutputFormat::Text => print_summary(&groups),
        OutputFormat::Json => log::info!(
            "Found {} duplicate set(s), {} reclaimable",
            groups.len(),
            ByteSize(total_reclaimable(&groups))
        ),
    }

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            render(&groups, args.format, &mut file)?;
            log::info!("Wrote {} group(s) to {}", groups.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            render(&groups, args.format, &mut stdout.lock())?;
        }
    }

    Ok(summary_exit_code(&groups, summary.as_ref()))
}

fn total_reclaimable(groups: &[DuplicateGroup]) -> u64 {
    groups.iter().map(DuplicateGroup::reclaimable_space).sum()
}

fn print_summary(groups: &[DuplicateGroup]) {
    let files: usize = groups.iter().map(DuplicateGroup::duplicate_count).sum();
    println!(
        "Found {} sets of duplicate files",
        groups.len().cyan().bold()
    );
    println!("Total duplicate files: {}", files.cyan());
    println!(
        "Total reclaimable size: {}",
        ByteSize(total_reclaimable(groups)).green().bold()
    );
    if !groups.is_empty() {
        println!();
    }
}

pub(crate) fn render(
    groups: &[DuplicateGroup],
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(groups, out)?,
        OutputFormat::Json => render_json(groups, out)?,
    }
    Ok(())
}

/// One line per set: `<size> * <count> => <path>, <path>, ...`
fn render_text(groups: &[DuplicateGroup], out: &mut dyn Write) -> io::Result<()> {
    for group in groups {
        let paths = group
            .paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{} * {} => {}", ByteSize(group.size), group.len(), paths)?;
    }
    Ok(())
}

fn render_json(groups: &[DuplicateGroup], out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, groups).context("Failed to serialize duplicate sets")?;
    writeln!(out)?;
    Ok(())
}
