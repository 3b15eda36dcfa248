//! Constellation fingerprint
//!
//! Peak-picking in the time-frequency plane via 2-D max filtering. The
//! surviving landmarks are bucketed into a fixed 32x8 frequency-by-time
//! grid of normalized peak counts, which keeps the output length constant
//! while preserving the sparse landmark layout. Intended for
//! duplicate/exact-clip detection.

use crate::config::DspConfig;
use crate::spectrum::{compute_spectrogram, Spectrogram};

pub const FREQ_CELLS: usize = 32;
pub const TIME_CELLS: usize = 8;
pub const VECTOR_LEN: usize = FREQ_CELLS * TIME_CELLS;

pub fn generate(samples: &[f32], dsp: &DspConfig) -> Vec<f32> {
    let spec = compute_spectrogram(samples, dsp.sample_rate, dsp.frame_size, dsp.hop_size);
    let peaks = find_peaks(&spec, dsp.peak_freq_filter, dsp.peak_time_filter);

    let bin_lo = spec.bin_for_freq(dsp.min_freq);
    let bin_hi = spec.bin_for_freq(dsp.max_freq);

    let mut grid = vec![0.0f32; VECTOR_LEN];
    let mut total = 0usize;

    for &(t, f) in &peaks {
        if f < bin_lo || f > bin_hi {
            continue;
        }
        let tc = (t * TIME_CELLS / spec.num_frames).min(TIME_CELLS - 1);
        let fc = ((f - bin_lo) * FREQ_CELLS / (bin_hi - bin_lo + 1)).min(FREQ_CELLS - 1);
        grid[tc * FREQ_CELLS + fc] += 1.0;
        total += 1;
    }

    // Normalize to a distribution so clip length doesn't dominate
    if total > 0 {
        for v in &mut grid {
            *v /= total as f32;
        }
    }

    grid
}

/// Find local maxima of the spectrogram via 2-D max filtering
///
/// A point survives when its magnitude is positive and equals the maximum
/// over the surrounding freq x time window.
fn find_peaks(spec: &Spectrogram, freq_filter: usize, time_filter: usize) -> Vec<(usize, usize)> {
    let num_frames = spec.num_frames;
    let num_bins = spec.num_bins;

    // Filter in the frequency dimension
    let mut freq_filtered = vec![vec![0.0f32; num_bins]; num_frames];
    for t in 0..num_frames {
        for f in 0..num_bins {
            let f_start = f.saturating_sub(freq_filter / 2);
            let f_end = (f + freq_filter / 2 + 1).min(num_bins);
            let max_val = (f_start..f_end)
                .map(|fi| spec.magnitudes[t][fi])
                .fold(f32::NEG_INFINITY, f32::max);
            freq_filtered[t][f] = max_val;
        }
    }

    // Then in the time dimension
    let mut peaks = Vec::new();
    for t in 0..num_frames {
        let t_start = t.saturating_sub(time_filter / 2);
        let t_end = (t + time_filter / 2 + 1).min(num_frames);
        for f in 0..num_bins {
            let max_val = (t_start..t_end)
                .map(|ti| freq_filtered[ti][f])
                .fold(f32::NEG_INFINITY, f32::max);

            let original = spec.magnitudes[t][f];
            if original > 0.0 && (original - max_val).abs() < 1e-6 {
                peaks.push((t, f));
            }
        }
    }

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_has_no_peaks() {
        let dsp = DspConfig::default();
        let silence = vec![0.0f32; 32000];
        let grid = generate(&silence, &dsp);
        assert!(grid.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tone_produces_normalized_grid() {
        let dsp = DspConfig::default();
        let samples: Vec<f32> = (0..48000)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let grid = generate(&samples, &dsp);
        assert_eq!(grid.len(), VECTOR_LEN);

        let sum: f32 = grid.iter().sum();
        assert!((sum - 1.0).abs() < 1e-3);
    }
}
