//! Chroma (pitch-class) fingerprint
//!
//! FFT bins are folded onto the 12 pitch classes relative to the tuning
//! reference, aggregated over 6 time slices. Collapsing octaves makes the
//! vector more robust to timbral differences between takes of the same song.

use crate::config::DspConfig;
use crate::spectrum::compute_spectrogram;

pub const PITCH_CLASSES: usize = 12;
pub const TIME_SLICES: usize = 6;
pub const VECTOR_LEN: usize = PITCH_CLASSES * TIME_SLICES;

pub fn generate(samples: &[f32], dsp: &DspConfig) -> Vec<f32> {
    let spec = compute_spectrogram(samples, dsp.sample_rate, dsp.frame_size, dsp.hop_size);

    // Pitch class per bin, None outside the analysed range
    let class_of_bin: Vec<Option<usize>> = (0..spec.num_bins)
        .map(|bin| {
            let freq = spec.freq_for_bin(bin);
            if freq < dsp.min_freq || freq > dsp.max_freq {
                return None;
            }
            let semitones = 12.0 * (freq / dsp.ref_freq).log2();
            let class = (semitones.round() as i64).rem_euclid(12) as usize;
            Some(class)
        })
        .collect();

    let mut energy = vec![0.0f32; VECTOR_LEN];
    let mut frames_per_slice = vec![0usize; TIME_SLICES];

    for (frame_idx, frame) in spec.magnitudes.iter().enumerate() {
        let slice = frame_idx * TIME_SLICES / spec.num_frames;
        frames_per_slice[slice] += 1;
        for (bin, &mag) in frame.iter().enumerate() {
            if let Some(class) = class_of_bin[bin] {
                energy[slice * PITCH_CLASSES + class] += mag;
            }
        }
    }

    for slice in 0..TIME_SLICES {
        let n = frames_per_slice[slice];
        if n > 0 {
            for class in 0..PITCH_CLASSES {
                energy[slice * PITCH_CLASSES + class] /= n as f32;
            }
        }
    }

    energy
}
