//! Duplicate detection: size buckets, staged hashing, group reporting.
//!
//! The flow is strictly lazier-first: files with a unique size are never
//! read, same-size files are compared by a 4 KiB prefix digest, and only
//! prefix collisions pay for a full-content digest.

pub mod buckets;
pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{sort_by_reclaimable, DuplicateGroup};
