//! Content hashing with BLAKE3.
//!
//! Files are digested in two stages: a cheap prefix digest over the first
//! [`PREFIX_LEN`] bytes weeds out same-size files that differ early, and a
//! full-content digest confirms the survivors. Both stages stream through a
//! fixed-size buffer, so memory use stays constant regardless of file size.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// A 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Number of leading bytes covered by the prefix stage.
///
/// Files shorter than this are fully covered by their prefix digest, which
/// then equals their full digest.
pub const PREFIX_LEN: u64 = 4096;

/// Streaming BLAKE3 hasher for the scan pipeline.
#[derive(Debug, Default, Clone)]
pub struct Hasher;

impl Hasher {
    pub fn new() -> Self {
        Self
    }

    /// Digests a file's content, optionally limited to the first `limit` bytes.
    ///
    /// With `limit = None` the whole file is read. With `limit = Some(n)` at
    /// most `n` bytes are read; a file shorter than `n` is read to its end
    /// without error, so the digest of a short file is identical under both
    /// modes.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NotFound`] or [`HashError::PermissionDenied`] when
    /// the file cannot be opened, and [`HashError::Io`] for read failures.
    pub fn digest_file(&self, path: &Path, limit: Option<u64>) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let mut hasher = blake3::Hasher::new();

        let copied = match limit {
            Some(n) => io::copy(&mut file.take(n), &mut hasher),
            None => io::copy(&mut { file }, &mut hasher),
        };
        copied.map_err(|e| map_io_error(path, e))?;

        Ok(hasher.finalize().into())
    }

    /// Digests the first [`PREFIX_LEN`] bytes of a file.
    pub fn prefix_digest(&self, path: &Path) -> Result<Digest, HashError> {
        self.digest_file(path, Some(PREFIX_LEN))
    }

    /// Digests the entire file content.
    pub fn full_digest(&self, path: &Path) -> Result<Digest, HashError> {
        self.digest_file(path, None)
    }
}

/// Formats a digest as a lowercase hex string.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn map_io_error(path: &Path, err: io::Error) -> HashError {
    match err.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_full_digest_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.txt", b"hello world");
        let hasher = Hasher::new();

        let first = hasher.full_digest(&path).unwrap();
        let second = hasher.full_digest(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_identical_content_same_digest() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"same content");
        let b = write_file(&dir, "b.txt", b"same content");
        let hasher = Hasher::new();

        assert_eq!(
            hasher.full_digest(&a).unwrap(),
            hasher.full_digest(&b).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_digest() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"content one");
        let b = write_file(&dir, "b.txt", b"content two");
        let hasher = Hasher::new();

        assert_ne!(
            hasher.full_digest(&a).unwrap(),
            hasher.full_digest(&b).unwrap()
        );
    }

    #[test]
    fn test_prefix_equals_full_for_small_files() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "small.txt", b"fits in one prefix");
        let hasher = Hasher::new();

        assert_eq!(
            hasher.prefix_digest(&path).unwrap(),
            hasher.full_digest(&path).unwrap()
        );
    }

    #[test]
    fn test_prefix_ignores_tail_beyond_limit() {
        let dir = TempDir::new().unwrap();
        let mut shared = vec![0xAB; PREFIX_LEN as usize];
        shared.extend_from_slice(b"tail one");
        let a = write_file(&dir, "a.bin", &shared);

        let mut other = vec![0xAB; PREFIX_LEN as usize];
        other.extend_from_slice(b"tail two");
        let b = write_file(&dir, "b.bin", &other);

        let hasher = Hasher::new();
        assert_eq!(
            hasher.prefix_digest(&a).unwrap(),
            hasher.prefix_digest(&b).unwrap()
        );
        assert_ne!(
            hasher.full_digest(&a).unwrap(),
            hasher.full_digest(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_file_digest() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "empty_a", b"");
        let b = write_file(&dir, "empty_b", b"");
        let hasher = Hasher::new();

        let da = hasher.full_digest(&a).unwrap();
        let db = hasher.full_digest(&b).unwrap();
        assert_eq!(da, db);
        assert_eq!(da, hasher.prefix_digest(&a).unwrap());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let hasher = Hasher::new();
        let err = hasher
            .full_digest(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }

    #[test]
    fn test_digest_to_hex_format() {
        let digest: Digest = [0u8; 32];
        let hex = digest_to_hex(&digest);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == '0'));

        let mut mixed: Digest = [0u8; 32];
        mixed[0] = 0xff;
        mixed[31] = 0x01;
        let hex = digest_to_hex(&mixed);
        assert!(hex.starts_with("ff"));
        assert!(hex.ends_with("01"));
    }
}
