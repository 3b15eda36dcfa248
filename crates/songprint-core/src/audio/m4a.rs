//! M4A/AAC decoding using Symphonia

use super::decoder::AudioBuffer;
use crate::error::EngineError;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

fn decode_error(path: &Path, reason: impl ToString) -> EngineError {
    EngineError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Decode an M4A/AAC file
pub fn decode_m4a(path: &Path) -> Result<AudioBuffer, EngineError> {
    let file = std::fs::File::open(path).map_err(|e| decode_error(path, e))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &MetadataOptions::default())
        .map_err(|e| decode_error(path, e))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error(path, "no audio track found"))?;

    let track_id = track.id;
    let codec_params = &track.codec_params;

    let sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(2) as u16;

    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(path, e))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => return Err(decode_error(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        // Corrupted packets are skipped so a damaged tail doesn't lose the take
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(_) => continue,
        };

        if let Err(reason) = append_interleaved(&decoded, &mut samples) {
            return Err(decode_error(path, reason));
        }
    }

    let duration_ms = if sample_rate > 0 && channels > 0 {
        (samples.len() as f64 / (sample_rate as u64 * channels as u64) as f64 * 1000.0) as u32
    } else {
        0
    };

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
        duration_ms,
    })
}

/// Convert a decoded Symphonia buffer to interleaved f32 samples
fn append_interleaved(decoded: &AudioBufferRef, samples: &mut Vec<f32>) -> Result<(), &'static str> {
    match decoded {
        AudioBufferRef::F32(buf) => {
            for frame_idx in 0..buf.frames() {
                for ch in 0..buf.spec().channels.count() {
                    samples.push(buf.chan(ch)[frame_idx]);
                }
            }
        }
        AudioBufferRef::F64(buf) => {
            for frame_idx in 0..buf.frames() {
                for ch in 0..buf.spec().channels.count() {
                    samples.push(buf.chan(ch)[frame_idx] as f32);
                }
            }
        }
        AudioBufferRef::S32(buf) => {
            for frame_idx in 0..buf.frames() {
                for ch in 0..buf.spec().channels.count() {
                    samples.push(buf.chan(ch)[frame_idx] as f32 / i32::MAX as f32);
                }
            }
        }
        AudioBufferRef::S16(buf) => {
            for frame_idx in 0..buf.frames() {
                for ch in 0..buf.spec().channels.count() {
                    samples.push(buf.chan(ch)[frame_idx] as f32 / i16::MAX as f32);
                }
            }
        }
        AudioBufferRef::U8(buf) => {
            for frame_idx in 0..buf.frames() {
                for ch in 0..buf.spec().channels.count() {
                    samples.push((buf.chan(ch)[frame_idx] as f32 - 128.0) / 128.0);
                }
            }
        }
        _ => return Err("unsupported sample format"),
    }
    Ok(())
}
