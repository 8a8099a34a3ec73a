//! Confirmed duplicate groups and their ordering.
//!
//! A [`DuplicateGroup`] holds the paths of files whose full content digests
//! matched. Groups are reported largest-win first: sorted by the space a
//! cleanup could reclaim, which is the shared size times the number of
//! members beyond the one copy that must remain.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A set of two or more files with byte-identical content.
///
/// Members keep the order in which they were discovered, so the first path
/// is the earliest-seen copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Size in bytes shared by every member.
    pub size: u64,
    /// Member paths in discovery order.
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    #[must_use]
    pub fn new(size: u64, paths: Vec<PathBuf>) -> Self {
        Self { size, paths }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Members beyond the single copy worth keeping.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes freed by deleting all members but one.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.size.saturating_mul(self.duplicate_count() as u64)
    }

    /// Total bytes consumed by all members together.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size.saturating_mul(self.paths.len() as u64)
    }

    /// The earliest-discovered member, if any.
    #[must_use]
    pub fn first_path(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

/// Sorts groups so the most space-saving cleanup targets come first.
///
/// Descending by reclaimable space; ties broken by the first member path in
/// ascending lexicographic order, which keeps the output stable across runs.
pub fn sort_by_reclaimable(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.reclaimable_space()
            .cmp(&a.reclaimable_space())
            .then_with(|| a.first_path().cmp(&b.first_path()))
    });
}
