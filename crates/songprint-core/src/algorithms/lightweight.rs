//! Lightweight band-energy fingerprint
//!
//! Same construction as the spectral algorithm at lower time and frequency
//! resolution: coarser non-overlapping frames, 16 bands, 3 time slices.

use crate::config::DspConfig;
use crate::spectrum::compute_spectrogram;

pub const BANDS: usize = 16;
pub const TIME_SLICES: usize = 3;
pub const VECTOR_LEN: usize = BANDS * TIME_SLICES;

pub fn generate(samples: &[f32], dsp: &DspConfig) -> Vec<f32> {
    let spec = compute_spectrogram(
        samples,
        dsp.sample_rate,
        dsp.lightweight_frame_size,
        dsp.lightweight_hop_size,
    );
    super::banded_profile(&spec, dsp.min_freq, dsp.max_freq, BANDS, TIME_SLICES)
}
