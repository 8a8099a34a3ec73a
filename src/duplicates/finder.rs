//! Duplicate detection pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the whole scan:
//!
//! 1. **Walking**: every root is walked and the discovered files are pooled
//!    into one flat list, deduplicated by path so overlapping roots cannot
//!    count a file twice.
//! 2. **Hashing**: the pool streams through a [`BucketArena`], which buckets
//!    by size and digests file content only when a bucket holds a potential
//!    duplicate pair.
//! 3. **Reporting**: confirmed groups are sorted so the largest reclaimable
//!    space comes first.
//!
//! Per-file problems (unreadable entries, files vanishing mid-scan) are
//! collected in the [`ScanSummary`] and never abort the run. Only bad roots
//! and a user interrupt are fatal.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")])?;
//! for group in &groups {
//!     println!("{} bytes x {}", group.size, group.len());
//! }
//! println!("{} reclaimable", summary.reclaimable_display());
//! # Ok::<(), dupescan::duplicates::FinderError>(())
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, Hasher, ScanError, Walker};

use super::buckets::BucketArena;
use super::groups::{sort_by_reclaimable, DuplicateGroup};

/// Configuration for a duplicate scan.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary of a completed scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Regular files enumerated across all roots, after dedup.
    pub total_files: usize,
    /// Combined size of all enumerated files.
    pub total_size: u64,
    /// Prefix digests computed.
    pub prefix_digests: usize,
    /// Full-content digests computed.
    pub full_digests: usize,
    /// Confirmed duplicate groups.
    pub duplicate_groups: usize,
    /// Files beyond the first member of each group.
    pub duplicate_files: usize,
    /// Bytes freed by keeping one member per group.
    pub reclaimable_space: u64,
    /// Wall-clock duration of the scan.
    pub scan_duration: Duration,
    /// Non-fatal errors: unreadable entries, files lost mid-scan.
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty()
    }

    /// Human-readable reclaimable space.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize(self.reclaimable_space).to_string()
    }

    /// Human-readable total size.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize(self.total_size).to_string()
    }
}

/// Fatal scan errors.
///
/// Everything else (unreadable files, vanished entries) is demoted to a
/// [`ScanError`] in the summary.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Scan interrupted by user")]
    Interrupted,

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Orchestrates walking, staged hashing and group collection.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    fn is_shutdown_requested(&self) -> bool {
        self.config
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_start(phase, total);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_end(phase);
        }
    }

    fn report_progress(&self, current: usize, total: usize, path: &Path) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_progress(current, total, &path.to_string_lossy());
        }
    }

    /// Scans the given roots and returns duplicate groups plus a summary.
    ///
    /// Groups come back sorted by reclaimable space, largest first, with
    /// ties broken by the first member path. An empty root list is a no-op
    /// that returns empty results.
    ///
    /// # Errors
    ///
    /// Fails fast with [`FinderError::PathNotFound`] or
    /// [`FinderError::NotADirectory`] if any root is unusable, before any
    /// file is touched. Returns [`FinderError::Interrupted`] when the
    /// shutdown flag is raised mid-scan.
    pub fn find_duplicates(
        &self,
        roots: &[PathBuf],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let started = Instant::now();
        let mut summary = ScanSummary::default();

        if roots.is_empty() {
            log::warn!("No paths given, nothing to scan");
            return Ok((Vec::new(), summary));
        }

        // Validate every root before touching any file.
        for root in roots {
            if !root.exists() {
                return Err(FinderError::PathNotFound(root.clone()));
            }
            if !root.is_dir() {
                return Err(FinderError::NotADirectory(root.clone()));
            }
        }

        log::info!("Starting scan of {} root(s)", roots.len());
        let pending = self.enumerate(roots, &mut summary)?;
        log::info!(
            "Walk complete: {} file(s), {}",
            summary.total_files,
            summary.total_size_display()
        );

        if self.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut groups = self.hash_pending(pending, &mut summary)?;
        sort_by_reclaimable(&mut groups);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::reclaimable_space).sum();
        summary.scan_duration = started.elapsed();

        log::info!(
            "Scan complete: {} group(s), {} duplicate file(s), {} reclaimable in {:.2?}",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.scan_duration
        );
        Ok((groups, summary))
    }

    /// Pools files from all roots into one list, deduplicated by path.
    fn enumerate(
        &self,
        roots: &[PathBuf],
        summary: &mut ScanSummary,
    ) -> Result<Vec<FileEntry>, FinderError> {
        self.phase_start("walking", 0);
        let mut pending = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for root in roots {
            let mut walker = Walker::new(root);
            if let Some(flag) = &self.config.shutdown_flag {
                walker = walker.with_shutdown_flag(Arc::clone(flag));
            }
            for item in walker.walk() {
                match item {
                    Ok(file) => {
                        if seen.insert(file.path.clone()) {
                            summary.total_files += 1;
                            summary.total_size += file.size;
                            self.report_progress(pending.len() + 1, 0, &file.path);
                            pending.push(file);
                        } else {
                            log::debug!("Already recorded: {}", file.path.display());
                        }
                    }
                    Err(err) => summary.scan_errors.push(err),
                }
            }
            if self.is_shutdown_requested() {
                return Err(FinderError::Interrupted);
            }
        }

        self.phase_end("walking");
        Ok(pending)
    }

    /// Streams the pool through the bucket arena, digesting as needed.
    fn hash_pending(
        &self,
        pending: Vec<FileEntry>,
        summary: &mut ScanSummary,
    ) -> Result<Vec<DuplicateGroup>, FinderError> {
        let total = pending.len();
        self.phase_start("hashing", total);

        let mut arena = BucketArena::new();
        for (i, file) in pending.into_iter().enumerate() {
            if self.is_shutdown_requested() {
                return Err(FinderError::Interrupted);
            }
            self.report_progress(i + 1, total, &file.path);
            arena.add_file(&self.hasher, file);
        }
        self.phase_end("hashing");

        log::debug!("{} distinct size bucket(s)", arena.bucket_count());
        let (groups, stats) = arena.into_groups();
        summary.prefix_digests = stats.prefix_digests;
        summary.full_digests = stats.full_digests;
        summary
            .scan_errors
            .extend(stats.errors.into_iter().map(ScanError::from));
        Ok(groups)
    }
}
