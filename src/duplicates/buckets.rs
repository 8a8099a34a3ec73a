//! Per-size bucket state machine for staged hashing.
//!
//! Files stream in one at a time and land in a bucket keyed by their exact
//! size. Each bucket moves through two states:
//!
//! - **Pending**: one file of this size has been seen. It is held unhashed,
//!   since a file with a unique size cannot be a duplicate.
//! - **Staged**: a second file of the same size arrived. Both files (and any
//!   later arrivals) get a prefix digest. When two files share a prefix
//!   digest, that prefix slot is promoted and its carriers get full-content
//!   digests; files sharing a full digest form a duplicate group.
//!
//! A file whose digest fails is dropped alone. Its bucket peers stay in
//! play, so one unreadable file never hides duplicates among the others.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::scanner::{digest_to_hex, Digest, FileEntry, HashError, Hasher};

use super::DuplicateGroup;

/// Hashing work and failures accumulated by an arena.
#[derive(Debug, Default)]
pub struct BucketStats {
    /// Prefix digests computed.
    pub prefix_digests: usize,
    /// Full-content digests computed.
    pub full_digests: usize,
    /// Files dropped because a digest failed.
    pub errors: Vec<HashError>,
}

enum SizeBucket {
    /// Sole file of this size, held unhashed.
    Pending(FileEntry),
    /// Two or more files of this size seen; hashing underway.
    Staged(StagedBucket),
}

#[derive(Default)]
struct StagedBucket {
    by_prefix: HashMap<Digest, PrefixSlot>,
    by_content: HashMap<Digest, Vec<FileEntry>>,
}

enum PrefixSlot {
    /// Sole carrier of this prefix digest, not yet fully hashed.
    Unconfirmed(FileEntry),
    /// Prefix was shared at some point; every carrier goes to full hashing.
    Resolved,
}

/// Streaming arena that buckets files by size and hashes them lazily.
pub struct BucketArena {
    buckets: HashMap<u64, SizeBucket>,
    stats: BucketStats,
}

impl BucketArena {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            stats: BucketStats::default(),
        }
    }

    /// Distinct file sizes seen so far.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Feeds one file into its size bucket, hashing only as far as needed.
    pub fn add_file(&mut self, hasher: &Hasher, file: FileEntry) {
        let size = file.size;
        let next = match self.buckets.remove(&size) {
            None => SizeBucket::Pending(file),
            Some(SizeBucket::Pending(held)) => {
                let mut staged = StagedBucket::default();
                self.stage(hasher, &mut staged, held);
                self.stage(hasher, &mut staged, file);
                SizeBucket::Staged(staged)
            }
            Some(SizeBucket::Staged(mut staged)) => {
                self.stage(hasher, &mut staged, file);
                SizeBucket::Staged(staged)
            }
        };
        self.buckets.insert(size, next);
    }

    /// Consumes the arena, yielding groups of two or more identical files.
    ///
    /// Pending buckets and unconfirmed prefix slots are discarded; those
    /// files had no confirmed peer. Group members keep discovery order.
    /// Group ordering is left to the caller.
    #[must_use]
    pub fn into_groups(self) -> (Vec<DuplicateGroup>, BucketStats) {
        let mut groups = Vec::new();
        for (size, bucket) in self.buckets {
            let SizeBucket::Staged(staged) = bucket else {
                continue;
            };
            for members in staged.by_content.into_values() {
                if members.len() < 2 {
                    continue;
                }
                let paths = members.into_iter().map(|f| f.path).collect();
                groups.push(DuplicateGroup::new(size, paths));
            }
        }
        (groups, self.stats)
    }

    fn stage(&mut self, hasher: &Hasher, staged: &mut StagedBucket, file: FileEntry) {
        let prefix = match hasher.prefix_digest(&file.path) {
            Ok(digest) => digest,
            Err(err) => {
                self.drop_file(err);
                return;
            }
        };
        self.stats.prefix_digests += 1;

        match staged.by_prefix.entry(prefix) {
            Entry::Vacant(slot) => {
                slot.insert(PrefixSlot::Unconfirmed(file));
            }
            Entry::Occupied(slot) => {
                // Second carrier of this prefix. Promote the slot, sending
                // the held peer (if still unconfirmed) to full hashing first
                // so discovery order survives into the group.
                let prev = std::mem::replace(slot.into_mut(), PrefixSlot::Resolved);
                if let PrefixSlot::Unconfirmed(peer) = prev {
                    self.confirm(hasher, &mut staged.by_content, peer);
                }
                self.confirm(hasher, &mut staged.by_content, file);
            }
        }
    }

    fn confirm(
        &mut self,
        hasher: &Hasher,
        by_content: &mut HashMap<Digest, Vec<FileEntry>>,
        file: FileEntry,
    ) {
        match hasher.full_digest(&file.path) {
            Ok(digest) => {
                self.stats.full_digests += 1;
                let members = by_content.entry(digest).or_default();
                members.push(file);
                log::trace!(
                    "Content digest {} has {} member(s)",
                    digest_to_hex(&digest),
                    members.len()
                );
            }
            Err(err) => self.drop_file(err),
        }
    }

    fn drop_file(&mut self, err: HashError) {
        log::warn!("Skipping {}: {}", err.path().display(), err);
        self.stats.errors.push(err);
    }
}

impl Default for BucketArena {
    fn default() -> Self {
        Self::new()
    }
}
