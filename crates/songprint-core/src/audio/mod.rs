//! Audio decoding and resampling
//!
//! Supports the formats practice recorders commonly produce: WAV, MP3, FLAC,
//! OGG Vorbis and M4A/AAC, using pure Rust decoders.

mod decoder;
mod m4a;
mod resample;

pub use decoder::{decode_audio, AudioBuffer};
pub use resample::resample_to_target;

use std::path::Path;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
    M4a,
    Unknown,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("wav") | Some("wave") => AudioFormat::Wav,
            Some("mp3") => AudioFormat::Mp3,
            Some("flac") => AudioFormat::Flac,
            Some("ogg") => AudioFormat::Ogg,
            Some("m4a") | Some("mp4") | Some("aac") => AudioFormat::M4a,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}

/// Whether a path looks like an audio file this engine can decode
pub fn is_audio_file(path: &Path) -> bool {
    AudioFormat::from_path(path).is_supported()
}
