//! Audio decoding for multiple formats

use super::{resample_to_target, AudioFormat};
use crate::error::EngineError;
use std::path::Path;

/// Decoded audio data
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_ms: u32,
}

impl AudioBuffer {
    /// Convert to mono by averaging channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }

        let mut mono = Vec::with_capacity(self.samples.len() / self.channels as usize);
        for chunk in self.samples.chunks(self.channels as usize) {
            let avg: f32 = chunk.iter().sum::<f32>() / chunk.len() as f32;
            mono.push(avg);
        }
        mono
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> EngineError {
    EngineError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn duration_ms(samples: usize, sample_rate: u32, channels: u16) -> u32 {
    if sample_rate == 0 || channels == 0 {
        return 0;
    }
    (samples as f64 / (sample_rate as u64 * channels as u64) as f64 * 1000.0) as u32
}

/// Decode an audio file to mono samples at the target sample rate
pub fn decode_audio(path: &Path, target_sample_rate: u32) -> Result<AudioBuffer, EngineError> {
    if !path.exists() {
        return Err(decode_error(path, "file not found"));
    }

    let format = AudioFormat::from_path(path);

    let mut audio = match format {
        AudioFormat::Wav => decode_wav(path)?,
        AudioFormat::Mp3 => decode_mp3(path)?,
        AudioFormat::Flac => decode_flac(path)?,
        AudioFormat::Ogg => decode_ogg(path)?,
        AudioFormat::M4a => super::m4a::decode_m4a(path)?,
        AudioFormat::Unknown => {
            return Err(decode_error(path, "unsupported audio format"));
        }
    };

    if audio.samples.is_empty() || audio.sample_rate == 0 {
        return Err(EngineError::EmptyAudio);
    }

    // Downmix and resample to the engine rate
    if audio.sample_rate != target_sample_rate {
        let mono = audio.to_mono();
        let resampled = resample_to_target(&mono, audio.sample_rate, target_sample_rate);
        audio.samples = resampled;
        audio.sample_rate = target_sample_rate;
        audio.channels = 1;
    } else if audio.channels > 1 {
        audio.samples = audio.to_mono();
        audio.channels = 1;
    }

    Ok(audio)
}

/// Decode WAV file
fn decode_wav(path: &Path) -> Result<AudioBuffer, EngineError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| decode_error(path, e))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| decode_error(path, e))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| decode_error(path, e))?
        }
    };

    let duration_ms = duration_ms(samples.len(), sample_rate, channels);

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
        duration_ms,
    })
}

/// Decode MP3 file
fn decode_mp3(path: &Path) -> Result<AudioBuffer, EngineError> {
    let data = std::fs::read(path).map_err(|e| decode_error(path, e))?;

    let mut decoder = minimp3::Decoder::new(&data[..]);
    let mut samples = Vec::new();
    let mut sample_rate = 0;
    let mut channels = 0;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate == 0 {
                    sample_rate = frame.sample_rate as u32;
                    channels = frame.channels as u16;
                }
                for &sample in &frame.data {
                    samples.push(sample as f32 / 32768.0);
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(decode_error(path, e)),
        }
    }

    let duration_ms = duration_ms(samples.len(), sample_rate, channels);

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
        duration_ms,
    })
}

/// Decode FLAC file
fn decode_flac(path: &Path) -> Result<AudioBuffer, EngineError> {
    let mut reader = claxon::FlacReader::open(path).map_err(|e| decode_error(path, e))?;

    let info = reader.streaminfo();
    let sample_rate = info.sample_rate;
    let channels = info.channels as u16;
    let bits_per_sample = info.bits_per_sample;

    let max_val = (1i64 << (bits_per_sample - 1)) as f32;
    let samples: Vec<f32> = reader
        .samples()
        .map(|s| s.map(|v| v as f32 / max_val))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| decode_error(path, e))?;

    let duration_ms = duration_ms(samples.len(), sample_rate, channels);

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
        duration_ms,
    })
}

/// Decode OGG Vorbis file
fn decode_ogg(path: &Path) -> Result<AudioBuffer, EngineError> {
    let file = std::fs::File::open(path).map_err(|e| decode_error(path, e))?;

    let mut reader =
        lewton::inside_ogg::OggStreamReader::new(file).map_err(|e| decode_error(path, e))?;

    let sample_rate = reader.ident_hdr.audio_sample_rate;
    let channels = reader.ident_hdr.audio_channels as u16;

    let mut samples = Vec::new();

    loop {
        match reader.read_dec_packet_itl() {
            Ok(Some(packet)) => {
                for &sample in &packet {
                    samples.push(sample as f32 / 32768.0);
                }
            }
            Ok(None) => break,
            Err(e) => return Err(decode_error(path, e)),
        }
    }

    let duration_ms = duration_ms(samples.len(), sample_rate, channels);

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
        duration_ms,
    })
}
