//! Fingerprint algorithm implementations
//!
//! Each algorithm maps a mono signal to a fixed-length vector of
//! non-negative energies. Lengths are constants of the modules below;
//! see `Algorithm::vector_len`.

pub mod chroma;
pub mod constellation;
pub mod lightweight;
pub mod spectral;

use crate::spectrum::Spectrogram;

/// Aggregate a spectrogram into `slices x bands` mean band energies
///
/// Frames are assigned to equal-width time slices and FFT bins to
/// geometrically spaced bands covering [min_freq, max_freq]. The output is
/// slice-major and its length is `slices * bands` regardless of input
/// duration.
pub(crate) fn banded_profile(
    spec: &Spectrogram,
    min_freq: f32,
    max_freq: f32,
    bands: usize,
    slices: usize,
) -> Vec<f32> {
    let span = (max_freq / min_freq).log2();

    // Precompute each bin's band, or None outside the analysed range
    let band_of_bin: Vec<Option<usize>> = (0..spec.num_bins)
        .map(|bin| {
            let freq = spec.freq_for_bin(bin);
            if freq < min_freq || freq > max_freq {
                return None;
            }
            let band = ((freq / min_freq).log2() / span * bands as f32) as usize;
            Some(band.min(bands - 1))
        })
        .collect();

    let mut energy = vec![0.0f32; slices * bands];
    let mut frames_per_slice = vec![0usize; slices];

    for (frame_idx, frame) in spec.magnitudes.iter().enumerate() {
        let slice = frame_idx * slices / spec.num_frames;
        frames_per_slice[slice] += 1;
        for (bin, &mag) in frame.iter().enumerate() {
            if let Some(band) = band_of_bin[bin] {
                energy[slice * bands + band] += mag;
            }
        }
    }

    // Mean per frame, so slice energies don't scale with slice width
    for slice in 0..slices {
        let n = frames_per_slice[slice];
        if n > 0 {
            for band in 0..bands {
                energy[slice * bands + band] /= n as f32;
            }
        }
    }

    energy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{compute_spectrogram, log_band_edges};

    #[test]
    fn test_banded_profile_shape() {
        let samples: Vec<f32> = (0..32000)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let spec = compute_spectrogram(&samples, 16000, 4096, 2048);
        let profile = banded_profile(&spec, 60.0, 8000.0, 36, 4);
        assert_eq!(profile.len(), 144);
        assert!(profile.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_tone_energy_lands_in_expected_band() {
        let samples: Vec<f32> = (0..48000)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let spec = compute_spectrogram(&samples, 16000, 4096, 2048);
        let bands = 36;
        let profile = banded_profile(&spec, 60.0, 8000.0, bands, 1);

        let edges = log_band_edges(60.0, 8000.0, bands);
        let expected_band = (0..bands)
            .find(|&b| edges[b] <= 440.0 && 440.0 < edges[b + 1])
            .unwrap();

        let peak_band = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert!((peak_band as i64 - expected_band as i64).abs() <= 1);
    }
}
