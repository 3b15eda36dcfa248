//! Fingerprint vectors and the generator front-end
//!
//! A fingerprint is a fixed-length vector of non-negative energies whose
//! length depends only on the algorithm, never on the input duration, so
//! long and short recordings of the same song stay comparable.

use crate::algorithms;
use crate::audio::resample_to_target;
use crate::config::DspConfig;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fingerprint algorithm family
///
/// Vectors are comparable only within the same algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Band-energy profile over the musical range (default)
    #[default]
    Spectral,
    /// Same idea at lower resolution, for speed
    Lightweight,
    /// Pitch-class energies, robust to timbral differences between takes
    Chroma,
    /// Peak-landmark grid, for duplicate/exact-clip detection
    Constellation,
}

impl Algorithm {
    /// Output vector length; a constant property of the algorithm
    pub const fn vector_len(&self) -> usize {
        match self {
            Algorithm::Spectral => algorithms::spectral::VECTOR_LEN,
            Algorithm::Lightweight => algorithms::lightweight::VECTOR_LEN,
            Algorithm::Chroma => algorithms::chroma::VECTOR_LEN,
            Algorithm::Constellation => algorithms::constellation::VECTOR_LEN,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Algorithm::Spectral => "spectral",
            Algorithm::Lightweight => "lightweight",
            Algorithm::Chroma => "chroma",
            Algorithm::Constellation => "constellation",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spectral" => Ok(Algorithm::Spectral),
            "lightweight" => Ok(Algorithm::Lightweight),
            "chroma" => Ok(Algorithm::Chroma),
            "constellation" => Ok(Algorithm::Constellation),
            other => Err(EngineError::Config(format!(
                "unknown algorithm: {other}"
            ))),
        }
    }
}

/// Fixed-length feature vector plus its algorithm identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintVector {
    pub algorithm: Algorithm,
    pub values: Vec<f32>,
}

impl FingerprintVector {
    /// Build a vector, rejecting lengths that don't match the algorithm
    pub fn new(algorithm: Algorithm, values: Vec<f32>) -> Result<Self> {
        if values.len() != algorithm.vector_len() {
            return Err(EngineError::LengthMismatch {
                expected: algorithm.vector_len(),
                actual: values.len(),
            });
        }
        Ok(Self { algorithm, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every component is zero (e.g. silent audio)
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Check the length invariant against the algorithm
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(EngineError::InvalidTarget("empty vector".into()));
        }
        if self.values.len() != self.algorithm.vector_len() {
            return Err(EngineError::LengthMismatch {
                expected: self.algorithm.vector_len(),
                actual: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Fingerprint generator
///
/// Pure over decoded samples; the same input and algorithm always produce
/// the same vector.
pub struct FingerprintGenerator {
    dsp: DspConfig,
}

impl FingerprintGenerator {
    pub fn new(dsp: &DspConfig) -> Self {
        Self { dsp: dsp.clone() }
    }

    /// Generate a fingerprint from mono samples
    pub fn generate(
        &self,
        samples: &[f32],
        sample_rate: u32,
        algorithm: Algorithm,
    ) -> Result<FingerprintVector> {
        if samples.is_empty() || sample_rate == 0 {
            return Err(EngineError::EmptyAudio);
        }

        let resampled;
        let samples = if sample_rate != self.dsp.sample_rate {
            resampled = resample_to_target(samples, sample_rate, self.dsp.sample_rate);
            &resampled[..]
        } else {
            samples
        };

        if samples.is_empty() {
            return Err(EngineError::EmptyAudio);
        }

        let values = match algorithm {
            Algorithm::Spectral => algorithms::spectral::generate(samples, &self.dsp),
            Algorithm::Lightweight => algorithms::lightweight::generate(samples, &self.dsp),
            Algorithm::Chroma => algorithms::chroma::generate(samples, &self.dsp),
            Algorithm::Constellation => algorithms::constellation::generate(samples, &self.dsp),
        };

        debug_assert_eq!(values.len(), algorithm.vector_len());

        FingerprintVector::new(algorithm, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, seconds: f32, sample_rate: u32) -> Vec<f32> {
        let n = (seconds * sample_rate as f32) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_algorithm_round_trips_through_str() {
        for algo in [
            Algorithm::Spectral,
            Algorithm::Lightweight,
            Algorithm::Chroma,
            Algorithm::Constellation,
        ] {
            assert_eq!(algo.name().parse::<Algorithm>().unwrap(), algo);
        }
        assert!("fancy".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_vector_length_is_constant_per_algorithm() {
        let dsp = DspConfig::default();
        let gen = FingerprintGenerator::new(&dsp);

        let short = tone(440.0, 1.0, dsp.sample_rate);
        let long = tone(440.0, 5.0, dsp.sample_rate);

        for algo in [
            Algorithm::Spectral,
            Algorithm::Lightweight,
            Algorithm::Chroma,
            Algorithm::Constellation,
        ] {
            let a = gen.generate(&short, dsp.sample_rate, algo).unwrap();
            let b = gen.generate(&long, dsp.sample_rate, algo).unwrap();
            assert_eq!(a.len(), algo.vector_len());
            assert_eq!(b.len(), algo.vector_len());
        }
    }

    #[test]
    fn test_default_spectral_length_is_144() {
        assert_eq!(Algorithm::Spectral.vector_len(), 144);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let dsp = DspConfig::default();
        let gen = FingerprintGenerator::new(&dsp);
        let samples = tone(330.0, 2.0, dsp.sample_rate);

        let a = gen
            .generate(&samples, dsp.sample_rate, Algorithm::Spectral)
            .unwrap();
        let b = gen
            .generate(&samples, dsp.sample_rate, Algorithm::Spectral)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_audio_is_rejected() {
        let dsp = DspConfig::default();
        let gen = FingerprintGenerator::new(&dsp);
        let err = gen.generate(&[], dsp.sample_rate, Algorithm::Spectral);
        assert!(matches!(err, Err(EngineError::EmptyAudio)));
    }

    #[test]
    fn test_silent_audio_yields_zero_vector() {
        let dsp = DspConfig::default();
        let gen = FingerprintGenerator::new(&dsp);
        let silence = vec![0.0; dsp.sample_rate as usize * 2];

        for algo in [
            Algorithm::Spectral,
            Algorithm::Lightweight,
            Algorithm::Chroma,
            Algorithm::Constellation,
        ] {
            let vec = gen.generate(&silence, dsp.sample_rate, algo).unwrap();
            assert!(vec.is_zero(), "{algo} should produce a zero vector");
        }
    }

    #[test]
    fn test_non_negative_components() {
        let dsp = DspConfig::default();
        let gen = FingerprintGenerator::new(&dsp);
        let samples = tone(523.25, 3.0, dsp.sample_rate);

        for algo in [
            Algorithm::Spectral,
            Algorithm::Lightweight,
            Algorithm::Chroma,
            Algorithm::Constellation,
        ] {
            let vec = gen.generate(&samples, dsp.sample_rate, algo).unwrap();
            assert!(vec.values.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_mismatched_length_rejected() {
        let err = FingerprintVector::new(Algorithm::Spectral, vec![1.0; 10]);
        assert!(matches!(err, Err(EngineError::LengthMismatch { .. })));
    }
}
