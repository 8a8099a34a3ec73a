//! Directory walker built on walkdir.
//!
//! Traversal is single-threaded and yields entries in a deterministic order
//! (children sorted by file name), so repeated scans of an unchanged tree
//! produce identical results. Symbolic links are never followed; only regular
//! files are yielded. Empty files are included, since they are duplicates of
//! each other.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileEntry, ScanError};

/// Sequential directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
            shutdown_flag: None,
        }
    }

    /// Sets a shutdown flag for graceful termination.
    ///
    /// When the flag becomes `true`, the walk ends after the current entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walks the tree under the root, yielding regular files.
    ///
    /// Directories and symlinks are skipped silently; unreadable entries are
    /// yielded as [`ScanError`]s so the caller can record them without
    /// aborting the walk.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .take_while(|_| !self.is_shutdown_requested())
            .filter_map(|entry| match entry {
                Ok(entry) => self.process_entry(&entry),
                Err(err) => Some(Err(map_walk_error(&self.root, err))),
            })
    }

    fn process_entry(&self, entry: &walkdir::DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            log::debug!("Skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            return None;
        }

        match entry.metadata() {
            Ok(meta) => Some(Ok(FileEntry::new(entry.path(), meta.len()))),
            Err(err) => Some(Err(map_walk_error(entry.path(), err))),
        }
    }
}

fn map_walk_error(fallback: &Path, err: walkdir::Error) -> ScanError {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    match err.io_error().map(std::io::Error::kind) {
        Some(std::io::ErrorKind::PermissionDenied) => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path)
        }
        Some(std::io::ErrorKind::NotFound) => {
            log::debug!("Path vanished during walk: {}", path.display());
            ScanError::NotFound(path)
        }
        _ => {
            log::warn!("IO error at {}: {}", path.display(), err);
            let source = err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            ScanError::Io { path, source }
        }
    }
}
