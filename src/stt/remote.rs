//! Remote transcription over the OpenAI-compatible audio API

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::SttBackend;
use crate::audio::NormalizedAudio;
use crate::chat::billing_error;
use crate::config::Config;
use crate::{Error, Result};

/// Response from the `/audio/transcriptions` endpoint
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes speech via the hosted Whisper-compatible API
pub struct RemoteTranscriber {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    billing_url: String,
}

impl RemoteTranscriber {
    /// Create a remote transcriber from gateway configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.chat.api_key.clone(),
            base_url: config.chat.base_url.clone(),
            model: config.stt.remote_model.clone(),
            billing_url: config.chat.billing_url.clone(),
        }
    }
}

#[async_trait]
impl SttBackend for RemoteTranscriber {
    fn name(&self) -> &'static str {
        "remote-whisper"
    }

    async fn transcribe(&self, clip: &NormalizedAudio) -> Result<String> {
        let wav = clip.to_wav_bytes()?;
        tracing::debug!(audio_bytes = wav.len(), "starting remote transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav)
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Transcription(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let url = format!("{}/audio/transcriptions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            if let Some(billing) = billing_error(&body, &self.billing_url) {
                return Err(billing);
            }
            return Err(Error::Transcription(format!(
                "transcription API error {status}: {body}"
            )));
        }

        let result: TranscriptionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            e
        })?;

        Ok(result.text)
    }
}
