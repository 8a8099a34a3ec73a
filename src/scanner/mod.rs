//! File system scanning: directory walking and content hashing.
//!
//! The scanner is the input side of the pipeline. [`Walker`] enumerates
//! regular files under a root in a deterministic order, and [`Hasher`]
//! produces the prefix and full-content digests the grouping stage compares.

use std::path::{Path, PathBuf};

pub mod hasher;
pub mod walker;

pub use hasher::{digest_to_hex, Digest, Hasher, PREFIX_LEN};
pub use walker::Walker;

/// A regular file discovered during a walk.
///
/// Carries only what the grouping stage needs: the path and the byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Non-fatal errors raised while enumerating or hashing files.
///
/// These are logged and collected; they never abort a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors raised while digesting a single file.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// The path the failure refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
