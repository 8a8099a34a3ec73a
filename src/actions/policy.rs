//! Regex-based keep/delete selection for unattended cleanup.
//!
//! The `auto` subcommand decides per group which members to delete using
//! two patterns matched against the full path:
//!
//! - `prefer` marks the copies worth keeping.
//! - `over` (optional) marks the copies worth discarding.
//!
//! A group where nothing matches `prefer` is always left alone. With `over`
//! given, only members matching `over` (and not `prefer`) are deleted, and
//! only in groups that also contain a preferred copy. Without `over`, every
//! non-preferred member is deleted. `invert` flips the selection to delete
//! the preferred side instead; in every mode at least one member survives.

use std::path::PathBuf;

use regex::Regex;

use crate::duplicates::DuplicateGroup;

/// Compiled keep/delete policy.
#[derive(Debug, Clone)]
pub struct KeepPolicy {
    prefer: Regex,
    over: Option<Regex>,
    invert: bool,
}

impl KeepPolicy {
    #[must_use]
    pub fn new(prefer: Regex, over: Option<Regex>, invert: bool) -> Self {
        Self {
            prefer,
            over,
            invert,
        }
    }

    /// Selects the members of `group` to delete, in member order.
    ///
    /// An empty result means the group is left untouched. The selection
    /// never covers the whole group.
    #[must_use]
    pub fn select_deletions(&self, group: &DuplicateGroup) -> Vec<PathBuf> {
        let mut preferred = Vec::new();
        let mut over_set = Vec::new();

        for path in &group.paths {
            let text = path.to_string_lossy();
            if self.prefer.is_match(&text) {
                if self.over.as_ref().is_some_and(|o| o.is_match(&text)) {
                    log::warn!(
                        "{} matches both patterns, counting it as preferred",
                        path.display()
                    );
                }
                preferred.push(path.clone());
            } else if self.over.as_ref().is_some_and(|o| o.is_match(&text)) {
                over_set.push(path.clone());
            }
        }

        if preferred.is_empty() {
            log::debug!("No preferred member, leaving group alone");
            return Vec::new();
        }

        if self.over.is_some() {
            if over_set.is_empty() {
                return Vec::new();
            }
            if self.invert {
                preferred
            } else {
                over_set
            }
        } else {
            // Every member preferred: singling any out would be arbitrary,
            // and inverting would delete them all.
            if preferred.len() == group.len() {
                return Vec::new();
            }
            if self.invert {
                preferred
            } else {
                group
                    .paths
                    .iter()
                    .filter(|p| !preferred.contains(p))
                    .cloned()
                    .collect()
            }
        }
    }
}
