//! Spectral band-energy fingerprint (default algorithm)
//!
//! Overlapping frames, magnitude spectra, energies bucketed into 36
//! geometrically spaced bands over the 60-8000 Hz musical range, aggregated
//! over 4 time slices.

use crate::config::DspConfig;
use crate::spectrum::compute_spectrogram;

pub const BANDS: usize = 36;
pub const TIME_SLICES: usize = 4;
pub const VECTOR_LEN: usize = BANDS * TIME_SLICES;

pub fn generate(samples: &[f32], dsp: &DspConfig) -> Vec<f32> {
    let spec = compute_spectrogram(samples, dsp.sample_rate, dsp.frame_size, dsp.hop_size);
    super::banded_profile(&spec, dsp.min_freq, dsp.max_freq, BANDS, TIME_SLICES)
}
