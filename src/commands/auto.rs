//! `auto` subcommand: delete duplicates matched by a keep policy.

use std::path::Path;

use anyhow::{bail, Context, Result};
use regex::Regex;
use yansi::Paint;

use crate::actions::{
    create_link, delete_batch, validate_preserves_copy, BatchDeleteResult, DeleteConfig, KeepPolicy,
};
use crate::cli::AutoArgs;
use crate::duplicates::FinderError;
use crate::error::ExitCode;

use super::{scan_or_load, summary_exit_code, AppContext};

pub fn run(args: &AutoArgs, ctx: &AppContext) -> Result<ExitCode> {
    if args.link && !cfg!(unix) {
        bail!("--link requires symlink support and is only available on Unix platforms");
    }

    let prefer = Regex::new(&args.prefer)
        .with_context(|| format!("Invalid --prefer pattern: {}", args.prefer))?;
    let over = args
        .over
        .as_deref()
        .map(Regex::new)
        .transpose()
        .with_context(|| format!("Invalid --over pattern: {}", args.over.as_deref().unwrap_or("")))?;
    let policy = KeepPolicy::new(prefer, over, args.invert);

    let (groups, summary) = scan_or_load(
        &args.paths,
        args.from_cache.as_deref(),
        args.cache.as_deref(),
        ctx,
    )?;

    let delete_config = DeleteConfig {
        permanent: args.permanent,
        dry_run: args.dry_run,
    };

    let mut total = BatchDeleteResult::default();
    let mut untouched = 0usize;
    let mut link_failures = 0usize;

    for group in &groups {
        if ctx.shutdown.is_shutdown_requested() {
            return Err(FinderError::Interrupted.into());
        }

        let victims = policy.select_deletions(group);
        if victims.is_empty() {
            untouched += 1;
            continue;
        }
        // The policy never selects a whole group, so a failure here is a bug.
        validate_preserves_copy(&victims, group)?;

        let batch = delete_batch(&victims, group.size, &delete_config);
        if args.link {
            // Policy guarantees at least one survivor per group.
            if let Some(keeper) = group.paths.iter().find(|&p| !victims.contains(p)) {
                link_failures += link_replacements(keeper, &batch, args.dry_run);
            }
        }
        total.absorb(batch);
    }

    report(&total, untouched, args.dry_run);

    let mut code = summary_exit_code(&groups, summary.as_ref());
    if !total.all_succeeded() || link_failures > 0 {
        code = ExitCode::PartialSuccess;
    }
    Ok(code)
}

/// Replaces each deleted file with a symlink to the surviving copy.
fn link_replacements(keeper: &Path, batch: &BatchDeleteResult, dry_run: bool) -> usize {
    let mut failures = 0;
    for deleted in &batch.successes {
        if dry_run {
            log::info!(
                "[dry run] Would link {} -> {}",
                deleted.path.display(),
                keeper.display()
            );
            continue;
        }
        if let Err(err) = create_link(keeper, &deleted.path) {
            log::warn!("Failed to link {}: {}", deleted.path.display(), err);
            failures += 1;
        }
    }
    failures
}

fn report(total: &BatchDeleteResult, untouched: usize, dry_run: bool) {
    if dry_run {
        println!("{} {}", "[dry run]".yellow().bold(), total.summary());
    } else {
        println!("{}", total.summary());
    }
    if untouched > 0 {
        println!("{} group(s) left untouched by the keep policy", untouched);
    }
}
