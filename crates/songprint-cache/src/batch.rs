//! Batch fingerprint generation and library loading
//!
//! Generation over a folder is embarrassingly parallel: every file is
//! decoded and fingerprinted independently on the rayon pool, and a single
//! writer merges the results and persists the set once. Cancellation is
//! observed between files; completed entries are saved, unprocessed files
//! stay absent and are retried on the next pass.

use crate::signature::FileSignature;
use crate::store::FolderCache;
use crate::CacheEntry;
use rayon::prelude::*;
use serde::Serialize;
use songprint_core::audio::is_audio_file;
use songprint_core::{fingerprint_file, Algorithm, DspConfig, EngineError, FingerprintVector};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// A file that could not be fingerprinted
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub reason: String,
}

/// Outcome of one folder generation pass
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub folder: String,
    /// Fingerprints computed this pass
    pub generated: usize,
    /// Cache hits left untouched
    pub reused: usize,
    /// Per-file failures; the rest of the batch continues past them
    pub failed: Vec<FileFailure>,
    /// True when the pass stopped early on request
    pub cancelled: bool,
}

/// Fingerprint every supported audio file in a folder
///
/// Signature-matched entries are reused without decoding. The merged set
/// is saved exactly once, also when cancelled, so completed work survives.
pub fn fingerprint_folder(
    folder: &Path,
    algorithm: Algorithm,
    dsp: &DspConfig,
    cancel: &AtomicBool,
) -> Result<ScanReport, EngineError> {
    let mut cache = FolderCache::load(folder);

    let mut audio_files: Vec<String> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_audio_file(path))
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
        .collect();
    audio_files.sort();

    log::info!(
        "fingerprinting {} ({} audio files, algorithm {})",
        folder.display(),
        audio_files.len(),
        algorithm
    );

    // Partition into cache hits and files needing work
    let mut reused = 0usize;
    let mut pending: Vec<(String, PathBuf, FileSignature)> = Vec::new();
    let mut failed: Vec<FileFailure> = Vec::new();

    for name in audio_files {
        let path = folder.join(&name);
        let signature = match FileSignature::of(&path) {
            Ok(sig) => sig,
            Err(e) => {
                failed.push(FileFailure {
                    file: name,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let hit = cache
            .set
            .entries
            .get(&name)
            .map(|entry| {
                entry.signature == signature
                    && entry.algorithm == algorithm
                    && entry.vector().is_ok()
            })
            .unwrap_or(false);

        if hit {
            reused += 1;
        } else {
            pending.push((name, path, signature));
        }
    }

    // Decode and fingerprint independently; no shared state until the merge
    let outcomes: Vec<(String, FileSignature, Result<FingerprintVector, EngineError>)> = pending
        .into_par_iter()
        .filter_map(|(name, path, signature)| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let result = fingerprint_file(&path, algorithm, dsp);
            Some((name, signature, result))
        })
        .collect();

    let cancelled = cancel.load(Ordering::Relaxed);

    let mut generated = 0usize;
    for (name, signature, result) in outcomes {
        match result {
            Ok(vector) => {
                let is_reference_song = cache
                    .set
                    .entries
                    .get(&name)
                    .map(|e| e.is_reference_song)
                    .unwrap_or(false);
                cache.set.entries.insert(
                    name,
                    CacheEntry {
                        signature,
                        algorithm,
                        values: vector.values,
                        is_reference_song,
                        fingerprinted_at: chrono::Utc::now().to_rfc3339(),
                    },
                );
                generated += 1;
            }
            Err(e) => {
                log::warn!("could not fingerprint {}: {}", name, e);
                failed.push(FileFailure {
                    file: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    // Single writer per folder; completed entries persist even on cancel
    cache.save()?;

    Ok(ScanReport {
        folder: folder.display().to_string(),
        generated,
        reused,
        failed,
        cancelled,
    })
}

/// Load the fingerprint sets of many folders in parallel
pub fn load_library(folders: &[PathBuf]) -> Vec<FolderCache> {
    let caches: Vec<FolderCache> = folders
        .par_iter()
        .map(|folder| FolderCache::load(folder))
        .collect();

    let total: usize = caches.iter().map(|c| c.set.entries.len()).sum();
    log::info!(
        "loaded {} fingerprints from {} folders",
        total,
        caches.len()
    );
    caches
}

/// Flatten folder caches into matcher candidates
///
/// Entries whose stored values no longer satisfy their algorithm's length
/// invariant are dropped with a warning; algorithm filtering is left to
/// the matcher so mismatches show up in its diagnostics.
pub fn collect_candidates(caches: &[FolderCache]) -> Vec<songprint_core::Candidate> {
    let mut candidates = Vec::new();
    for cache in caches {
        let folder = cache.folder().display().to_string();
        for (file, entry) in &cache.set.entries {
            match entry.vector() {
                Ok(vector) => candidates.push(songprint_core::Candidate {
                    file: file.clone(),
                    folder: folder.clone(),
                    vector,
                    is_reference_folder: cache.set.is_reference_folder,
                    has_local_reference: cache.set.has_local_reference,
                    is_reference_song: entry.is_reference_song,
                }),
                Err(e) => {
                    log::warn!("dropping cache entry {}/{}: {}", folder, file, e);
                }
            }
        }
    }
    candidates
}
