//! Safe file deletion via the system trash.
//!
//! # Overview
//!
//! Deletion defaults to the platform trash (recoverable); permanent unlink
//! requires an explicit flag, and dry-run mode reports what would happen
//! without touching anything. Batch deletion verifies each file's size
//! against the scan before removing it, so a file that changed since the
//! scan is left alone, and [`validate_preserves_copy`] refuses selections
//! that would wipe out every member of a group.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::actions::delete::{delete_batch, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let victims = vec![PathBuf::from("/path/to/duplicate.txt")];
//! let result = delete_batch(&victims, 1024, &DeleteConfig::trash());
//! println!("{}", result.summary());
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("permission denied: {0} - try running with elevated privileges")]
    PermissionDenied(PathBuf),

    /// The file's size changed since the scan recorded it.
    #[error("file changed since scan: {0}")]
    Modified(PathBuf),

    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A successfully deleted (or would-be deleted, in dry-run mode) file.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub path: PathBuf,
    pub size: u64,
    pub permanent: bool,
}

/// Outcome of a batch deletion.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    pub successes: Vec<DeleteResult>,
    pub failures: Vec<(PathBuf, String)>,
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Merges another batch into this one.
    pub fn absorb(&mut self, other: BatchDeleteResult) {
        self.bytes_freed += other.bytes_freed;
        self.successes.extend(other.successes);
        self.failures.extend(other.failures);
    }

    /// One-line human-readable outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Deleted {} file(s), {} freed, {} failure(s)",
            self.success_count(),
            ByteSize(self.bytes_freed),
            self.failure_count()
        )
    }
}

/// How a batch deletion behaves.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Unlink instead of moving to trash.
    pub permanent: bool,
    /// Log what would happen without touching anything.
    pub dry_run: bool,
}

impl DeleteConfig {
    /// Config for recoverable deletion to the system trash.
    #[must_use]
    pub fn trash() -> Self {
        Self::default()
    }

    /// Config for unrecoverable deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self {
            permanent: true,
            dry_run: false,
        }
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Moves a single file to the system trash.
///
/// # Errors
///
/// Fails if the file is missing, unreadable, or the platform trash refuses
/// the operation.
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = stat_size(path)?;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: false,
    })
}

/// Permanently unlinks a single file. Not recoverable.
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = stat_size(path)?;

    fs::remove_file(path).map_err(|e| map_fs_error(path, e))?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: true,
    })
}

/// Deletes a set of same-size files, verifying each against `expected_size`.
///
/// Files whose current size differs from the scan are skipped with a
/// [`DeleteError::Modified`] failure entry. Failures never stop the batch;
/// the caller decides what to do with a partial result. In dry-run mode
/// nothing is touched and every existing file counts as a success.
#[must_use]
pub fn delete_batch(
    paths: &[PathBuf],
    expected_size: u64,
    config: &DeleteConfig,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    for path in paths {
        match delete_one(path, expected_size, config) {
            Ok(deleted) => {
                result.bytes_freed += deleted.size;
                result.successes.push(deleted);
            }
            Err(err) => {
                log::warn!("Failed to delete {}: {}", path.display(), err);
                result.failures.push((path.clone(), err.to_string()));
            }
        }
    }

    result
}

fn delete_one(
    path: &Path,
    expected_size: u64,
    config: &DeleteConfig,
) -> Result<DeleteResult, DeleteError> {
    let size = stat_size(path)?;
    if size != expected_size {
        return Err(DeleteError::Modified(path.to_path_buf()));
    }

    if config.dry_run {
        let action = if config.permanent {
            "permanently delete"
        } else {
            "move to trash"
        };
        log::info!("[dry run] Would {}: {}", action, path.display());
        return Ok(DeleteResult {
            path: path.to_path_buf(),
            size,
            permanent: config.permanent,
        });
    }

    if config.permanent {
        permanent_delete(path)
    } else {
        delete_to_trash(path)
    }
}

/// Refuses a selection that would delete every member of a group.
///
/// # Errors
///
/// Returns [`DeleteError::AllCopiesWouldBeDeleted`] when no member of
/// `group` would survive the selection.
pub fn validate_preserves_copy(
    selected: &[PathBuf],
    group: &DuplicateGroup,
) -> Result<(), DeleteError> {
    let selected: HashSet<&Path> = selected.iter().map(PathBuf::as_path).collect();
    let preserved = group
        .paths
        .iter()
        .filter(|p| !selected.contains(p.as_path()))
        .count();

    if preserved == 0 {
        return Err(DeleteError::AllCopiesWouldBeDeleted);
    }
    Ok(())
}

fn stat_size(path: &Path) -> Result<u64, DeleteError> {
    fs::metadata(path).map(|m| m.len()).map_err(|e| map_fs_error(path, e))
}

fn map_fs_error(path: &Path, err: io::Error) -> DeleteError {
    match err.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    }
}
