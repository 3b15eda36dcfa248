//! File signatures for cache invalidation
//!
//! A signature is a lightweight content marker of the source audio file,
//! not the audio fingerprint. Invalidation is signature-based only, never
//! time-based, so an unmodified file is never regenerated.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Size + modification time of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignature {
    pub size: u64,
    pub modified_ms: i64,
}

impl FileSignature {
    /// Compute the signature of a file on disk
    pub fn of(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let modified_ms = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Ok(Self {
            size: meta.len(),
            modified_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_changes_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");

        std::fs::write(&path, b"aaaa").unwrap();
        let first = FileSignature::of(&path).unwrap();

        std::fs::write(&path, b"aaaabbbb").unwrap();
        let second = FileSignature::of(&path).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_signature_stable_for_unmodified_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        std::fs::write(&path, b"aaaa").unwrap();

        let first = FileSignature::of(&path).unwrap();
        let second = FileSignature::of(&path).unwrap();
        assert_eq!(first, second);
    }
}
