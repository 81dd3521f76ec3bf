//! Speech-to-text with an ordered fallback chain
//!
//! Backends are tried in order, each at most once per request. A local
//! Whisper model (when compiled in and configured) runs first; the remote
//! transcription API is the fallback. Failure of every backend surfaces the
//! last error — no text is ever fabricated for the caller.

#[cfg(feature = "local-stt")]
pub mod local;
pub mod remote;

pub use remote::RemoteTranscriber;

use async_trait::async_trait;

use crate::audio::NormalizedAudio;
use crate::config::Config;
use crate::{Error, Result};

/// A single speech-to-text strategy
#[async_trait]
pub trait SttBackend: Send + Sync {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Transcribe a normalized clip to text
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedSpeech`] when the audio carried no usable
    /// speech, [`Error::BackendUnavailable`] when the backend itself failed,
    /// or other variants for remote-call failures
    async fn transcribe(&self, clip: &NormalizedAudio) -> Result<String>;
}

/// Ordered fallback sequence of speech-to-text backends
pub struct TranscriptionChain {
    backends: Vec<Box<dyn SttBackend>>,
}

impl TranscriptionChain {
    /// Build a chain from explicit backends, tried in order
    #[must_use]
    pub fn new(backends: Vec<Box<dyn SttBackend>>) -> Self {
        Self { backends }
    }

    /// Build the standard chain from configuration: local Whisper first when
    /// available, remote transcription API last
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut backends: Vec<Box<dyn SttBackend>> = Vec::new();

        #[cfg(feature = "local-stt")]
        if config.stt.local_available {
            if let Some(path) = &config.stt.local_model_path {
                match local::LocalWhisper::new(path) {
                    Ok(backend) => backends.push(Box::new(backend)),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "local Whisper failed to load, remote transcription only"
                        );
                    }
                }
            }
        }

        backends.push(Box::new(RemoteTranscriber::from_config(config)));

        tracing::info!(
            backends = ?backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "transcription chain ready"
        );

        Self { backends }
    }

    /// Backend names in fallback order
    #[must_use]
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Transcribe a clip, falling through the chain until a backend succeeds
    ///
    /// # Errors
    ///
    /// Returns the last backend's error when every backend fails
    pub async fn transcribe(&self, clip: &NormalizedAudio) -> Result<String> {
        let mut last_error = Error::BackendUnavailable(
            "no transcription backends configured".to_string(),
        );

        for backend in &self.backends {
            match backend.transcribe(clip).await {
                Ok(text) => {
                    let text = text.trim().to_string();
                    if text.is_empty() {
                        tracing::warn!(backend = backend.name(), "empty transcript, falling back");
                        last_error = Error::UnrecognizedSpeech;
                        continue;
                    }
                    tracing::info!(backend = backend.name(), transcript = %text, "transcription complete");
                    return Ok(text);
                }
                Err(e) => {
                    if e.triggers_fallback() {
                        tracing::info!(backend = backend.name(), error = %e, "falling back to next backend");
                    } else {
                        tracing::warn!(backend = backend.name(), error = %e, "backend failed");
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
