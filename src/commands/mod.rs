//! Subcommand implementations.
//!
//! Each subcommand gets the parsed args plus an [`AppContext`] carrying the
//! global flags and the process-wide shutdown handler, runs to completion,
//! and reports an [`ExitCode`]. Fatal failures bubble up as `anyhow` errors
//! and are rendered by `main`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cache::ScanFile;
use crate::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig, ScanSummary};
use crate::error::ExitCode;
use crate::progress::{Progress, ProgressCallback};
use crate::signal::ShutdownHandler;

pub mod auto;
pub mod interactive;
pub mod print;

/// Global state shared by every subcommand.
pub struct AppContext {
    pub quiet: bool,
    pub no_color: bool,
    pub shutdown: ShutdownHandler,
}

/// Produces groups either by scanning `paths` or by loading a saved scan.
///
/// The summary is `None` when the groups come from a saved scan; there is
/// no fresh scan to summarize in that case. When `cache` is set, the fresh
/// scan result is persisted before returning.
pub(crate) fn scan_or_load(
    paths: &[PathBuf],
    from_cache: Option<&Path>,
    cache: Option<&Path>,
    ctx: &AppContext,
) -> Result<(Vec<DuplicateGroup>, Option<ScanSummary>)> {
    if let Some(cache_path) = from_cache {
        let scan = ScanFile::load(cache_path)?;
        return Ok((scan.groups, None));
    }

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(ctx.quiet));
    let config = FinderConfig::default()
        .with_shutdown_flag(ctx.shutdown.get_flag())
        .with_progress_callback(progress);
    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(paths)?;

    if let Some(cache_path) = cache {
        ScanFile::new(paths.to_vec(), groups.clone()).save(cache_path)?;
    }
    Ok((groups, Some(summary)))
}

/// Exit code for a run that only inspected, never deleted.
pub(crate) fn summary_exit_code(
    groups: &[DuplicateGroup],
    summary: Option<&ScanSummary>,
) -> ExitCode {
    if summary.is_some_and(ScanSummary::has_errors) {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_group(size: u64, count: usize) -> DuplicateGroup {
        let paths = (0..count).map(|i| PathBuf::from(format!("/f{i}"))).collect();
        DuplicateGroup::new(size, paths)
    }

    #[test]
    fn test_exit_code_no_duplicates() {
        let summary = ScanSummary::default();
        assert_eq!(
            summary_exit_code(&[], Some(&summary)),
            ExitCode::NoDuplicates
        );
        assert_eq!(summary_exit_code(&[], None), ExitCode::NoDuplicates);
    }

    #[test]
    fn test_exit_code_success() {
        let groups = vec![make_group(10, 2)];
        let summary = ScanSummary::default();
        assert_eq!(
            summary_exit_code(&groups, Some(&summary)),
            ExitCode::Success
        );
    }

    #[test]
    fn test_exit_code_partial_on_scan_errors() {
        let groups = vec![make_group(10, 2)];
        let summary = ScanSummary {
            scan_errors: vec![crate::scanner::ScanError::NotFound(PathBuf::from("/gone"))],
            ..ScanSummary::default()
        };
        assert_eq!(
            summary_exit_code(&groups, Some(&summary)),
            ExitCode::PartialSuccess
        );
    }
}
