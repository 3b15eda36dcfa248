//! Per-folder fingerprint cache
//!
//! Owns one folder's `FolderFingerprintSet`: tolerant loading, atomic
//! saving, signature-checked `get_or_generate`, and an explicit cleanup
//! pass for entries whose source files disappeared.

use crate::format::{CacheFormat, FolderFingerprintSet, CACHE_FILE_BSON, CACHE_FILE_JSON};
use crate::signature::FileSignature;
use crate::CacheEntry;
use songprint_core::{fingerprint_file, Algorithm, DspConfig, EngineError, FingerprintVector};
use std::path::{Path, PathBuf};

/// Fingerprint cache for one folder
#[derive(Debug, Clone)]
pub struct FolderCache {
    folder: PathBuf,
    format: CacheFormat,
    pub set: FolderFingerprintSet,
}

impl FolderCache {
    /// Load a folder's cache
    ///
    /// A missing or corrupt cache file yields an empty set, never an
    /// error; entries regenerate lazily.
    pub fn load(folder: &Path) -> Self {
        let json_path = folder.join(CACHE_FILE_JSON);
        let bson_path = folder.join(CACHE_FILE_BSON);

        let (path, format) = if json_path.exists() {
            (json_path, CacheFormat::Json)
        } else if bson_path.exists() {
            (bson_path, CacheFormat::Bson)
        } else {
            return Self {
                folder: folder.to_path_buf(),
                format: CacheFormat::Json,
                set: FolderFingerprintSet::default(),
            };
        };

        let set = match std::fs::read(&path)
            .map_err(EngineError::from)
            .and_then(|bytes| FolderFingerprintSet::from_bytes(&bytes, format))
        {
            Ok(set) => set,
            Err(e) => {
                log::warn!(
                    "unreadable fingerprint cache {}, starting empty: {}",
                    path.display(),
                    e
                );
                FolderFingerprintSet::default()
            }
        };

        Self {
            folder: folder.to_path_buf(),
            format,
            set,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Path of the cache file this cache persists to
    pub fn cache_path(&self) -> PathBuf {
        self.folder.join(self.format.file_name())
    }

    /// Persist the full set atomically
    ///
    /// Serializes to a temp file next to the target and renames it into
    /// place, so an interrupted save never leaves a partial cache.
    pub fn save(&mut self) -> Result<(), EngineError> {
        self.set.version = crate::format::FORMAT_VERSION.to_string();
        self.set.updated_at = Some(chrono::Utc::now().to_rfc3339());

        let target = self.cache_path();
        let tmp = target.with_extension("tmp");

        let bytes = self.set.to_bytes(self.format)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &target)?;

        log::debug!(
            "saved {} fingerprints to {}",
            self.set.entries.len(),
            target.display()
        );
        Ok(())
    }

    /// Cached vector for `file_name`, or generate and store a fresh one
    ///
    /// A cache hit requires a matching signature and algorithm; hits never
    /// touch the decoder, so repeated passes over unmodified files are
    /// idempotent.
    pub fn get_or_generate(
        &mut self,
        file_name: &str,
        algorithm: Algorithm,
        dsp: &DspConfig,
    ) -> Result<FingerprintVector, EngineError> {
        self.get_or_generate_with(file_name, algorithm, |path| {
            fingerprint_file(path, algorithm, dsp)
        })
    }

    /// `get_or_generate` with an injectable generator, used by callers that
    /// precompute vectors and by tests that count decoder invocations
    pub fn get_or_generate_with<F>(
        &mut self,
        file_name: &str,
        algorithm: Algorithm,
        generate: F,
    ) -> Result<FingerprintVector, EngineError>
    where
        F: FnOnce(&Path) -> Result<FingerprintVector, EngineError>,
    {
        let path = self.folder.join(file_name);
        let signature = FileSignature::of(&path)?;

        if let Some(entry) = self.set.entries.get(file_name) {
            if entry.signature == signature && entry.algorithm == algorithm {
                if let Ok(vector) = entry.vector() {
                    return Ok(vector);
                }
            }
        }

        let vector = generate(&path)?;

        // A regenerated entry keeps its reference-song flag
        let is_reference_song = self
            .set
            .entries
            .get(file_name)
            .map(|e| e.is_reference_song)
            .unwrap_or(false);

        self.set.entries.insert(
            file_name.to_string(),
            CacheEntry {
                signature,
                algorithm,
                values: vector.values.clone(),
                is_reference_song,
                fingerprinted_at: chrono::Utc::now().to_rfc3339(),
            },
        );

        Ok(vector)
    }

    /// Explicit cleanup pass: drop entries whose source file is gone
    ///
    /// Never runs automatically; stale entries persist until a caller asks
    /// for this. Returns the removed file names.
    pub fn remove_stale(&mut self) -> Vec<String> {
        let folder = self.folder.clone();
        let stale: Vec<String> = self
            .set
            .entries
            .keys()
            .filter(|name| !folder.join(name).exists())
            .cloned()
            .collect();

        for name in &stale {
            self.set.entries.remove(name);
        }

        if !stale.is_empty() {
            log::info!(
                "removed {} stale cache entries from {}",
                stale.len(),
                folder.display()
            );
        }
        stale
    }
}
