//! Engine configuration
//!
//! TOML-backed configuration for the analysis front-end and the matcher.
//! Band counts and vector lengths are properties of each algorithm, not of
//! the configuration, so two configs can never produce incomparable vectors
//! for the same algorithm.

use crate::error::EngineError;
use crate::fingerprint::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis front-end parameters shared by all fingerprint algorithms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DspConfig {
    /// Engine sample rate; decoded audio is resampled to this
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// FFT frame size for the spectral, chroma and constellation algorithms
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// Hop between successive frames
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
    /// Coarser frame size used by the lightweight algorithm
    #[serde(default = "default_lightweight_frame_size")]
    pub lightweight_frame_size: usize,
    /// Lightweight hop; equal to the frame size, so frames do not overlap
    #[serde(default = "default_lightweight_hop_size")]
    pub lightweight_hop_size: usize,
    /// Lower edge of the analysed musical range (Hz)
    #[serde(default = "default_min_freq")]
    pub min_freq: f32,
    /// Upper edge of the analysed musical range (Hz)
    #[serde(default = "default_max_freq")]
    pub max_freq: f32,
    /// Tuning reference for pitch-class mapping (A4)
    #[serde(default = "default_ref_freq")]
    pub ref_freq: f32,
    /// Frequency extent of the constellation peak filter (bins)
    #[serde(default = "default_peak_freq_filter")]
    pub peak_freq_filter: usize,
    /// Time extent of the constellation peak filter (frames)
    #[serde(default = "default_peak_time_filter")]
    pub peak_time_filter: usize,
}

impl Default for DspConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            frame_size: default_frame_size(),
            hop_size: default_hop_size(),
            lightweight_frame_size: default_lightweight_frame_size(),
            lightweight_hop_size: default_lightweight_hop_size(),
            min_freq: default_min_freq(),
            max_freq: default_max_freq(),
            ref_freq: default_ref_freq(),
            peak_freq_filter: default_peak_freq_filter(),
            peak_time_filter: default_peak_time_filter(),
        }
    }
}

fn default_sample_rate() -> u32 {
    16000
}
fn default_frame_size() -> usize {
    4096
}
fn default_hop_size() -> usize {
    2048
}
fn default_lightweight_frame_size() -> usize {
    2048
}
fn default_lightweight_hop_size() -> usize {
    2048
}
fn default_min_freq() -> f32 {
    60.0
}
fn default_max_freq() -> f32 {
    8000.0
}
fn default_ref_freq() -> f32 {
    440.0
}
fn default_peak_freq_filter() -> usize {
    15
}
fn default_peak_time_filter() -> usize {
    9
}

/// Matching parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum weighted score for an accepted match, in [0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Boost for candidates in the designated reference folder
    #[serde(default = "default_reference_folder_boost")]
    pub reference_folder_boost: f32,
    /// Boost for candidates whose folder carries its own reference flag
    #[serde(default = "default_local_reference_boost")]
    pub local_reference_boost: f32,
    /// Boost for candidates individually flagged as reference songs
    #[serde(default = "default_reference_song_boost")]
    pub reference_song_boost: f32,
    /// Number of top candidates recorded in diagnostics
    #[serde(default = "default_top_candidates")]
    pub top_candidates: usize,
    /// Lower bound of the near-threshold diagnostic window, as a fraction
    /// of the threshold
    #[serde(default = "default_near_threshold_factor")]
    pub near_threshold_factor: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            reference_folder_boost: default_reference_folder_boost(),
            local_reference_boost: default_local_reference_boost(),
            reference_song_boost: default_reference_song_boost(),
            top_candidates: default_top_candidates(),
            near_threshold_factor: default_near_threshold_factor(),
        }
    }
}

fn default_threshold() -> f32 {
    0.8
}
fn default_reference_folder_boost() -> f32 {
    0.15
}
fn default_local_reference_boost() -> f32 {
    0.10
}
fn default_reference_song_boost() -> f32 {
    0.10
}
fn default_top_candidates() -> usize {
    10
}
fn default_near_threshold_factor() -> f32 {
    0.5
}

/// Known practice folders, supplied by the workflow layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Folders whose caches are loaded at match time
    #[serde(default)]
    pub folders: Vec<String>,
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fingerprint algorithm used for generation and matching
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub dsp: DspConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), EngineError> {
        let dsp = &self.dsp;
        if dsp.sample_rate == 0 {
            return Err(EngineError::Config("sample_rate must be > 0".into()));
        }
        if dsp.min_freq >= dsp.max_freq {
            return Err(EngineError::Config("min_freq must be < max_freq".into()));
        }
        if dsp.max_freq > dsp.sample_rate as f32 / 2.0 {
            return Err(EngineError::Config(
                "max_freq must not exceed the Nyquist frequency".into(),
            ));
        }
        if dsp.hop_size == 0 || dsp.hop_size > dsp.frame_size {
            return Err(EngineError::Config(
                "hop_size must be in 1..=frame_size".into(),
            ));
        }
        if dsp.lightweight_hop_size == 0
            || dsp.lightweight_hop_size > dsp.lightweight_frame_size
        {
            return Err(EngineError::Config(
                "lightweight_hop_size must be in 1..=lightweight_frame_size".into(),
            ));
        }
        let m = &self.matching;
        if !(0.0..=1.0).contains(&m.threshold) {
            return Err(EngineError::Config("threshold must be in [0, 1]".into()));
        }
        Ok(())
    }
}
