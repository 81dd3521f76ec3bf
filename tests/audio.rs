//! Audio normalization integration tests
//!
//! Exercises decode, downmix, resample, and the temp-file contract without
//! requiring audio hardware.

use std::io::Cursor;

use voxfolio::Error;
use voxfolio::audio::{self, TARGET_SAMPLE_RATE, samples_to_wav};

/// Generate sine wave audio samples
fn generate_sine_samples(rate: u32, frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Encode interleaved i16 WAV bytes with the given channel count
fn encode_wav(interleaved: &[f32], rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in interleaved {
            let s = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn stereo_44k_wav_normalizes_to_mono_16k() {
    let mono = generate_sine_samples(44_100, 440.0, 0.5, 0.5);
    // Duplicate into interleaved stereo
    let stereo: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();
    let wav = encode_wav(&stereo, 44_100, 2);

    let clip = audio::normalize(&wav).unwrap();

    // Half a second of audio at 16 kHz, within resampler tolerance
    let expected = (TARGET_SAMPLE_RATE as f32 * 0.5) as usize;
    let len = clip.samples().len();
    assert!(
        len.abs_diff(expected) < expected / 10,
        "expected ~{expected} samples, got {len}"
    );
    assert!(clip.samples().iter().all(|s| s.abs() <= 1.0));
}

#[test]
fn native_rate_wav_passes_through() {
    let samples = generate_sine_samples(TARGET_SAMPLE_RATE, 440.0, 0.25, 0.5);
    let wav = encode_wav(&samples, TARGET_SAMPLE_RATE, 1);

    let clip = audio::normalize(&wav).unwrap();
    assert_eq!(clip.samples().len(), samples.len());
}

#[test]
fn unrecognized_bytes_are_a_decode_error() {
    let result = audio::normalize(b"not audio at all, sorry");
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn empty_input_is_a_decode_error() {
    assert!(matches!(audio::normalize(&[]), Err(Error::Decode(_))));
}

#[test]
fn wav_encoding_produces_riff_header() {
    let samples = generate_sine_samples(TARGET_SAMPLE_RATE, 440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, TARGET_SAMPLE_RATE).unwrap();

    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn wav_roundtrip_preserves_spec() {
    let original: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original, TARGET_SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav_data)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, TARGET_SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_back: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_back.len(), original.len());
}

#[test]
fn temp_wav_is_removed_when_handle_drops() {
    let samples = generate_sine_samples(TARGET_SAMPLE_RATE, 440.0, 0.1, 0.5);
    let wav = encode_wav(&samples, TARGET_SAMPLE_RATE, 1);
    let clip = audio::normalize(&wav).unwrap();

    let temp = clip.write_temp_wav().unwrap();
    let path = temp.path().to_path_buf();
    assert!(path.exists());

    drop(temp);
    assert!(!path.exists(), "temp artifact must not outlive the handle");
}

#[test]
fn duration_reflects_sample_count() {
    let clip = audio::from_samples(vec![0.0; TARGET_SAMPLE_RATE as usize]);
    assert!((clip.duration_secs() - 1.0).abs() < f32::EPSILON);
}
