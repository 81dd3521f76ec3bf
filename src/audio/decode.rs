//! Decoding of compressed/encoded audio clips
//!
//! Accepts WAV and MP3 containers and produces mono f32 samples at the
//! clip's native rate. Anything else is a [`Error::Decode`].

use std::io::Cursor;

use crate::{Error, Result};

/// A decoded clip: mono samples at the container's native sample rate
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in the range [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Native sample rate of the clip
    pub sample_rate: u32,
}

/// Decode arbitrary encoded audio bytes into mono samples
///
/// # Errors
///
/// Returns [`Error::Decode`] when the bytes are not a recognizable
/// container/codec
pub fn decode(bytes: &[u8]) -> Result<DecodedAudio> {
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        return decode_wav(bytes);
    }

    // MP3 has no fixed magic; let the decoder hunt for a sync word
    decode_mp3(bytes)
}

/// Decode a WAV container via hound, downmixing to mono
fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| Error::Decode(format!("invalid WAV: {e}")))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Decode(format!("invalid WAV samples: {e}")))?,
        hound::SampleFormat::Int => {
            let scale = f32::from(2u16).powi(i32::from(spec.bits_per_sample) - 1);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Decode(format!("invalid WAV samples: {e}")))?
        }
    };

    Ok(DecodedAudio {
        samples: downmix(&interleaved, channels),
        sample_rate: spec.sample_rate,
    })
}

/// Decode MP3 bytes to mono f32 samples
fn decode_mp3(bytes: &[u8]) -> Result<DecodedAudio> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(bytes));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate == 0 {
                    sample_rate = u32::try_from(frame.sample_rate.max(0)).unwrap_or(0);
                }

                if frame.channels == 2 {
                    // Stereo: average channels
                    samples.extend(frame.data.chunks(2).map(|chunk| {
                        let left = f32::from(chunk[0]) / 32768.0;
                        let right = f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                        (left + right) * 0.5
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Decode(format!("MP3 decode error: {e}"))),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(Error::Decode(
            "unrecognized audio container/codec".to_string(),
        ));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

/// Average interleaved channels down to mono
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
