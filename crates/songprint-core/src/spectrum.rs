//! Magnitude spectrogram computation
//!
//! Shared analysis front-end for all fingerprint algorithms: overlapping
//! Hann-windowed frames transformed with an FFT into per-frame magnitude
//! spectra.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

/// Magnitude spectrogram
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Magnitude values [time_frame][frequency_bin]
    pub magnitudes: Vec<Vec<f32>>,
    /// Number of time frames
    pub num_frames: usize,
    /// Number of frequency bins (frame_size / 2)
    pub num_bins: usize,
    /// Width of one FFT bin in Hz
    pub bin_hz: f32,
}

impl Spectrogram {
    /// FFT bin index for a frequency, clamped to the valid range
    pub fn bin_for_freq(&self, freq: f32) -> usize {
        ((freq / self.bin_hz) as usize).min(self.num_bins.saturating_sub(1))
    }

    /// Center frequency of an FFT bin
    pub fn freq_for_bin(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_hz
    }
}

/// Compute the magnitude spectrogram of a mono signal
///
/// Short signals are zero-padded to a single full frame, so the result
/// always has at least one frame.
pub fn compute_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Spectrogram {
    let num_bins = frame_size / 2;
    let num_frames = if samples.len() <= frame_size {
        1
    } else {
        (samples.len() - frame_size) / hop_size + 1
    };

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);

    let window = hann_window(frame_size);

    let mut magnitudes = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        let end = (start + frame_size).min(samples.len());

        let mut frame: Vec<Complex<f32>> = samples[start..end]
            .iter()
            .enumerate()
            .map(|(i, &s)| Complex::new(s * window[i], 0.0))
            .collect();
        frame.resize(frame_size, Complex::new(0.0, 0.0));

        fft.process(&mut frame);

        let mags: Vec<f32> = frame[..num_bins].iter().map(|c| c.norm()).collect();
        magnitudes.push(mags);
    }

    Spectrogram {
        magnitudes,
        num_frames,
        num_bins,
        bin_hz: sample_rate as f32 / frame_size as f32,
    }
}

/// Hann window of the given size
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let x = i as f32 / (size - 1) as f32;
            0.5 * (1.0 - (2.0 * PI * x).cos())
        })
        .collect()
}

/// Geometrically spaced band edges covering [min_freq, max_freq]
///
/// Returns `bands + 1` edges; band `b` spans `edges[b]..edges[b + 1]`.
pub fn log_band_edges(min_freq: f32, max_freq: f32, bands: usize) -> Vec<f32> {
    let ratio = (max_freq / min_freq).powf(1.0 / bands as f32);
    let mut edges = Vec::with_capacity(bands + 1);
    let mut edge = min_freq;
    for _ in 0..bands {
        edges.push(edge);
        edge *= ratio;
    }
    edges.push(max_freq);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hann_window() {
        let window = hann_window(512);
        assert_eq!(window.len(), 512);
        assert!(window[0].abs() < 0.001);
        assert!((window[256] - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_band_edges_are_geometric() {
        let edges = log_band_edges(60.0, 8000.0, 36);
        assert_eq!(edges.len(), 37);
        assert_relative_eq!(edges[0], 60.0, epsilon = 1e-3);
        assert_relative_eq!(edges[36], 8000.0, epsilon = 1e-1);
        // Constant ratio between successive edges
        let r0 = edges[1] / edges[0];
        let r1 = edges[20] / edges[19];
        assert_relative_eq!(r0, r1, epsilon = 1e-3);
    }

    #[test]
    fn test_short_signal_is_padded_to_one_frame() {
        let spec = compute_spectrogram(&[0.5; 100], 16000, 4096, 2048);
        assert_eq!(spec.num_frames, 1);
        assert_eq!(spec.num_bins, 2048);
    }

    #[test]
    fn test_sine_peaks_in_expected_bin() {
        let sample_rate = 16000;
        let freq = 1000.0;
        let samples: Vec<f32> = (0..16000)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();

        let spec = compute_spectrogram(&samples, sample_rate, 4096, 2048);
        let frame = &spec.magnitudes[2];
        let peak_bin = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        let expected = spec.bin_for_freq(freq);
        assert!((peak_bin as i64 - expected as i64).abs() <= 1);
    }
}
