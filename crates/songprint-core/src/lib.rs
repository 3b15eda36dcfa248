//! songprint Core - Audio Fingerprinting and Matching Engine
//!
//! Converts recordings into compact fixed-length fingerprints, scores
//! similarity between them, and resolves which known recording an
//! unlabeled file most likely represents across many session folders.

pub mod algorithms;
pub mod audio;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fingerprint;
pub mod matching;
pub mod scoring;
pub mod spectrum;

pub use config::{DspConfig, EngineConfig, LibraryConfig, MatchConfig};
pub use diagnostics::{MatchDiagnostics, ScoredCandidate, SkippedCandidate};
pub use error::{EngineError, Result};
pub use fingerprint::{Algorithm, FingerprintGenerator, FingerprintVector};
pub use matching::{Candidate, CrossFolderMatcher, MatchResult};
pub use scoring::score;

use std::path::Path;

/// Fingerprint an audio file
///
/// Decodes the file, downmixes to mono at the engine sample rate, and
/// generates a fingerprint with the requested algorithm.
pub fn fingerprint_file(
    path: &Path,
    algorithm: Algorithm,
    dsp: &DspConfig,
) -> Result<FingerprintVector> {
    let audio = audio::decode_audio(path, dsp.sample_rate)?;
    let mono = audio.to_mono();
    FingerprintGenerator::new(dsp).generate(&mono, audio.sample_rate, algorithm)
}
