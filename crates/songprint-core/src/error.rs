//! Engine error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by fingerprint generation, scoring, and matching
#[derive(Debug, Error)]
pub enum EngineError {
    /// Audio could not be decoded from the source file
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// Decoded audio has effectively zero duration
    #[error("audio is empty or effectively zero-length")]
    EmptyAudio,

    /// Two vectors from different algorithms were compared
    #[error("algorithm mismatch: {left} vs {right}")]
    AlgorithmMismatch { left: String, right: String },

    /// Two vectors of the same algorithm had different lengths
    #[error("vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The match target vector is empty or malformed (caller bug)
    #[error("invalid match target: {0}")]
    InvalidTarget(String),

    /// Invalid engine configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Persisted cache data could not be serialized or parsed
    #[error("cache data error: {0}")]
    CacheData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
