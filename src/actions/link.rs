//! Replacing deleted duplicates with symbolic links.
//!
//! After a duplicate is deleted, a symlink at its old path pointing to the
//! retained copy keeps existing references working. Only supported on Unix;
//! the CLI rejects the flag elsewhere.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("symbolic links are not supported on this platform")]
    Unsupported,

    #[error("failed to create link at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates a symlink at `at` pointing to `target`.
///
/// The caller is expected to have removed whatever lived at `at`; an
/// existing entry there is an error.
#[cfg(unix)]
pub fn create_link(target: &Path, at: &Path) -> Result<(), LinkError> {
    std::os::unix::fs::symlink(target, at).map_err(|e| LinkError::Io {
        path: at.to_path_buf(),
        source: e,
    })?;
    log::info!("Linked {} -> {}", at.display(), target.display());
    Ok(())
}

#[cfg(not(unix))]
pub fn create_link(_target: &Path, _at: &Path) -> Result<(), LinkError> {
    Err(LinkError::Unsupported)
}
