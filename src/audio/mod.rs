//! Audio normalization for transcription backends
//!
//! Every clip, whatever its container or rate, is reduced to the one shape
//! both transcription backends accept: mono f32 samples at 16 kHz.

pub mod capture;
pub mod decode;

pub use capture::AudioCapture;
pub use decode::{DecodedAudio, decode};

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::{Error, Result};

/// Sample rate expected by the transcription backends (16 kHz speech)
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A clip normalized to mono 16 kHz, ready for any transcription backend
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    samples: Vec<f32>,
}

impl NormalizedAudio {
    /// Mono 16 kHz samples
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Duration of the clip in seconds
    #[must_use]
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / TARGET_SAMPLE_RATE as f32
    }

    /// Encode the clip as WAV bytes for upload-style backends
    ///
    /// # Errors
    ///
    /// Returns error if WAV encoding fails
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        samples_to_wav(&self.samples, TARGET_SAMPLE_RATE)
    }

    /// Write the clip to a temporary WAV file for path-based backends.
    ///
    /// The file is deleted when the returned handle drops, on every exit
    /// path.
    ///
    /// # Errors
    ///
    /// Returns error if the temp file cannot be created or written
    pub fn write_temp_wav(&self) -> Result<tempfile::NamedTempFile> {
        let file = tempfile::Builder::new()
            .prefix("voxfolio-clip-")
            .suffix(".wav")
            .tempfile()?;
        std::fs::write(file.path(), self.to_wav_bytes()?)?;
        Ok(file)
    }
}

/// Normalize arbitrary encoded audio bytes to a mono 16 kHz clip
///
/// # Errors
///
/// Returns [`Error::Decode`] when the bytes are not recognizable audio
pub fn normalize(bytes: &[u8]) -> Result<NormalizedAudio> {
    let decoded = decode(bytes)?;

    tracing::debug!(
        input_bytes = bytes.len(),
        native_rate = decoded.sample_rate,
        samples = decoded.samples.len(),
        "decoded audio clip"
    );

    let samples = resample_to_target(&decoded.samples, decoded.sample_rate)?;
    Ok(NormalizedAudio { samples })
}

/// Resample mono samples from `from_rate` to [`TARGET_SAMPLE_RATE`]
fn resample_to_target(input: &[f32], from_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 {
        return Err(Error::Decode("audio clip reports 0 Hz sample rate".into()));
    }
    if from_rate == TARGET_SAMPLE_RATE || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = f64::from(TARGET_SAMPLE_RATE) / f64::from(from_rate);
    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let chunk = 1024usize;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk, 1)
        .map_err(|e| Error::Audio(format!("failed to construct resampler: {e}")))?;

    let expected = (input.len() as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(expected + chunk);

    let mut segment = vec![0.0f32; chunk];
    let mut idx = 0usize;
    while idx < input.len() {
        let end = (idx + chunk).min(input.len());
        let len = end - idx;
        // Pad the tail chunk with its last sample to keep the filter happy
        let pad = input[end - 1];
        segment.fill(pad);
        segment[..len].copy_from_slice(&input[idx..end]);

        let produced = resampler
            .process(std::slice::from_ref(&segment), None)
            .map_err(|e| Error::Audio(format!("resampling failed: {e}")))?;
        output.extend_from_slice(&produced[0]);
        idx = end;
    }

    // Trim the padding-induced overshoot
    if output.len() > expected {
        output.truncate(expected);
    }

    Ok(output)
}

/// Convert f32 samples to WAV bytes
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // Convert f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Wrap already-normalized samples (e.g. from microphone capture at 16 kHz)
#[must_use]
pub fn from_samples(samples: Vec<f32>) -> NormalizedAudio {
    NormalizedAudio { samples }
}
