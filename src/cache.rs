//! Saving and loading scan results.
//!
//! A scan is persisted as a JSON envelope `{ checksum, scan }` where the
//! checksum is the SHA-256 of the compact-serialized scan payload. On load
//! the payload is re-serialized and compared, so hand-edited or truncated
//! files are rejected instead of silently feeding wrong groups into a
//! cleanup. Members that vanished since the scan only produce a warning;
//! the actions layer re-checks every path before touching it.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::duplicates::DuplicateGroup;

/// Current scan file format version.
pub const SCAN_FORMAT_VERSION: u32 = 1;

/// A completed scan, as persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFile {
    /// Format version for forward-compatibility checks.
    pub version: u32,
    /// Roots that were scanned.
    pub roots: Vec<PathBuf>,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: u64,
    /// Duplicate groups in reporting order.
    pub groups: Vec<DuplicateGroup>,
}

#[derive(Serialize, Deserialize)]
struct ScanEnvelope {
    checksum: String,
    scan: ScanFile,
}

impl ScanFile {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, groups: Vec<DuplicateGroup>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            version: SCAN_FORMAT_VERSION,
            roots,
            created_at,
            groups,
        }
    }

    /// Serializes the scan as a checksummed JSON envelope.
    pub fn to_json(&self) -> Result<String> {
        let payload = serde_json::to_string(self).context("Failed to serialize scan")?;
        let envelope = ScanEnvelope {
            checksum: checksum_of(&payload),
            scan: self.clone(),
        };
        serde_json::to_string_pretty(&envelope).context("Failed to serialize scan envelope")
    }

    /// Writes the scan to `path`, overwriting any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create scan file: {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write scan file: {}", path.display()))?;
        log::info!("Saved {} group(s) to {}", self.groups.len(), path.display());
        Ok(())
    }

    /// Loads and verifies a scan previously written by [`ScanFile::save`].
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed JSON, checksum mismatches, and
    /// unsupported format versions.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan file: {}", path.display()))?;
        let envelope: ScanEnvelope = serde_json::from_str(&content)
            .context("Failed to parse scan file. It may be corrupted or in an old format.")?;

        let payload = serde_json::to_string(&envelope.scan)
            .context("Failed to re-serialize scan for checksum verification")?;
        if checksum_of(&payload) != envelope.checksum {
            bail!(
                "Scan file integrity check failed: checksum mismatch in {}",
                path.display()
            );
        }
        if envelope.scan.version != SCAN_FORMAT_VERSION {
            bail!(
                "Unsupported scan file version: {}. Current version is {}.",
                envelope.scan.version,
                SCAN_FORMAT_VERSION
            );
        }

        let missing = envelope.scan.missing_members();
        if !missing.is_empty() {
            log::warn!(
                "{} file(s) from the saved scan no longer exist on disk",
                missing.len()
            );
        }
        log::info!(
            "Loaded {} group(s) from {}",
            envelope.scan.groups.len(),
            path.display()
        );
        Ok(envelope.scan)
    }

    /// Group members that no longer exist on disk.
    #[must_use]
    pub fn missing_members(&self) -> Vec<&Path> {
        self.groups
            .iter()
            .flat_map(|g| g.paths.iter())
            .filter(|p| !p.exists())
            .map(PathBuf::as_path)
            .collect()
    }
}

fn checksum_of(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_scan(dir: &TempDir) -> ScanFile {
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"body").unwrap();
        std::fs::write(&b, b"body").unwrap();
        ScanFile::new(
            vec![dir.path().to_path_buf()],
            vec![DuplicateGroup::new(4, vec![a, b])],
        )
    }

    #[test]
    fn test_to_json_carries_checksum() {
        let dir = TempDir::new().unwrap();
        let scan = sample_scan(&dir);
        let json = scan.to_json().unwrap();
        assert!(json.contains("\"checksum\""));
        assert!(json.contains("\"version\": 1"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let scan = sample_scan(&dir);
        let path = dir.path().join("scan.json");

        scan.save(&path).unwrap();
        let loaded = ScanFile::load(&path).unwrap();
        assert_eq!(loaded, scan);
    }

    #[test]
    fn test_tampered_checksum_is_rejected() {
        let dir = TempDir::new().unwrap();
        let scan = sample_scan(&dir);
        let path = dir.path().join("scan.json");

        let json = scan.to_json().unwrap();
        let tampered = json.replace("\"checksum\": \"", "\"checksum\": \"bad");
        std::fs::write(&path, tampered).unwrap();

        let err = ScanFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("integrity check failed"));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let scan = sample_scan(&dir);
        let path = dir.path().join("scan.json");

        let json = scan.to_json().unwrap();
        let tampered = json.replace("\"size\": 4", "\"size\": 400");
        assert_ne!(json, tampered);
        std::fs::write(&path, tampered).unwrap();

        let err = ScanFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("integrity check failed"));
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut scan = sample_scan(&dir);
        scan.version = 999;
        let path = dir.path().join("scan.json");

        // Valid checksum, wrong version.
        std::fs::write(&path, scan.to_json().unwrap()).unwrap();

        let err = ScanFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported scan file version"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, "not json at all {{{").unwrap();

        assert!(ScanFile::load(&path).is_err());
    }

    #[test]
    fn test_missing_members_reported() {
        let dir = TempDir::new().unwrap();
        let scan = sample_scan(&dir);
        assert!(scan.missing_members().is_empty());

        std::fs::remove_file(&scan.groups[0].paths[0]).unwrap();
        assert_eq!(scan.missing_members().len(), 1);
    }

    #[test]
    fn test_round_trip_many_groups() {
        let dir = TempDir::new().unwrap();
        let groups: Vec<DuplicateGroup> = (0..500)
            .map(|i| {
                DuplicateGroup::new(
                    i,
                    vec![
                        PathBuf::from(format!("/data/{i}/a")),
                        PathBuf::from(format!("/data/{i}/b")),
                    ],
                )
            })
            .collect();
        let scan = ScanFile::new(vec![PathBuf::from("/data")], groups);
        let path = dir.path().join("scan.json");

        scan.save(&path).unwrap();
        let loaded = ScanFile::load(&path).unwrap();
        assert_eq!(loaded.groups.len(), 500);
        assert_eq!(loaded, scan);
    }
}
