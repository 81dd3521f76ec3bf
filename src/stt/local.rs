//! Local Whisper speech recognition
//!
//! Wraps `whisper_rs` as the first backend in the transcription chain. The
//! GGML model is loaded once at startup and reused for every request.

use std::path::Path;

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::SttBackend;
use crate::audio::NormalizedAudio;
use crate::{Error, Result};

/// On-device Whisper recognizer
pub struct LocalWhisper {
    ctx: WhisperContext,
}

impl LocalWhisper {
    /// Load the Whisper model from disk
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] if the model cannot be loaded
    pub fn new(model_path: &Path) -> Result<Self> {
        let path = model_path
            .to_str()
            .ok_or_else(|| Error::BackendUnavailable("non-UTF8 model path".to_string()))?;

        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| {
                Error::BackendUnavailable(format!("failed to load whisper model: {e}"))
            })?;

        tracing::info!(path = %model_path.display(), "local Whisper model loaded");
        Ok(Self { ctx })
    }

    /// Run inference over a 16 kHz mono clip
    fn run(&self, samples: &[f32]) -> Result<String> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| Error::BackendUnavailable(format!("whisper state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_progress(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_translate(false);
        params.set_token_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| Error::BackendUnavailable(format!("whisper inference: {e}")))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| Error::BackendUnavailable(format!("whisper segments: {e}")))?;

        // Whisper splits output into small segments; stitch them together
        let mut transcript = String::new();
        for i in 0..num_segments {
            if let Ok(text) = state.full_get_segment_text_lossy(i) {
                transcript.push_str(&text);
            }
        }

        // Whisper emits [BLANK_AUDIO] for silence; that is not speech
        let transcript = transcript.replace("[BLANK_AUDIO]", "");
        if transcript.trim().is_empty() {
            return Err(Error::UnrecognizedSpeech);
        }

        Ok(transcript)
    }
}

#[async_trait]
impl SttBackend for LocalWhisper {
    fn name(&self) -> &'static str {
        "local-whisper"
    }

    async fn transcribe(&self, clip: &NormalizedAudio) -> Result<String> {
        tracing::debug!(
            duration_secs = clip.duration_secs(),
            "starting local transcription"
        );
        self.run(clip.samples())
    }
}
