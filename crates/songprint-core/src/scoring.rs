//! Similarity scoring between fingerprint vectors
//!
//! Cosine similarity with defined degenerate cases: a zero-norm operand
//! scores 0.0 (with a warning) instead of dividing by zero, and the result
//! is clamped to [0, 1]. All shipped algorithms emit non-negative energies,
//! so the cosine already lands in [0, 1]; the clamp guards float drift and
//! any future algorithm with signed components.

use crate::error::{EngineError, Result};
use crate::fingerprint::FingerprintVector;

/// Cosine similarity between two vectors of the same algorithm
///
/// Symmetric, and `score(v, v)` is 1.0 within 1e-6 for non-zero `v`.
pub fn score(a: &FingerprintVector, b: &FingerprintVector) -> Result<f32> {
    if a.algorithm != b.algorithm {
        return Err(EngineError::AlgorithmMismatch {
            left: a.algorithm.name().to_string(),
            right: b.algorithm.name().to_string(),
        });
    }
    if a.len() != b.len() {
        return Err(EngineError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    // f64 accumulation keeps the result reproducible within 1e-6
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.values.iter().zip(&b.values) {
        dot += x as f64 * y as f64;
        norm_a += x as f64 * x as f64;
        norm_b += y as f64 * y as f64;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        log::warn!(
            "zero-norm {} vector in similarity computation, scoring 0.0",
            a.algorithm
        );
        return Ok(0.0);
    }

    let cos = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(cos.clamp(0.0, 1.0) as f32)
}
