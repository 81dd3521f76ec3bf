//! Configuration management for the Voxfolio gateway
//!
//! All configuration is resolved once at startup into a read-only [`Config`]
//! that is passed explicitly into components. Precedence: env > config.toml >
//! default.

pub mod file;

use std::path::PathBuf;

use secrecy::SecretString;

use crate::persona::{DEFAULT_PERSONA_ID, Persona};
use crate::{Error, Result};

/// Default OpenAI-compatible endpoint (DeepInfra)
const DEFAULT_BASE_URL: &str = "https://api.deepinfra.com/v1/openai";

/// Default chat-completion model
const DEFAULT_CHAT_MODEL: &str = "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8";

/// Default remote transcription model
const DEFAULT_STT_MODEL: &str = "whisper-1";

/// Default billing page for insufficient-balance errors
const DEFAULT_BILLING_URL: &str = "https://deepinfra.com/billing";

/// Default API server port
const DEFAULT_PORT: u16 = 18890;

/// Voxfolio gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Active persona
    pub persona: Persona,

    /// Chat completion configuration
    pub chat: ChatConfig,

    /// Transcription configuration
    pub stt: SttConfig,

    /// HTTP API server configuration
    pub server: ServerConfig,
}

/// Chat completion configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API credential for the OpenAI-compatible endpoint
    pub api_key: SecretString,

    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,

    /// Model identifier for chat completions
    pub model: String,

    /// Billing page shown in insufficient-balance errors
    pub billing_url: String,
}

/// Transcription configuration
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// Remote transcription model identifier
    pub remote_model: String,

    /// Path to a local Whisper GGML model file, if any
    pub local_model_path: Option<PathBuf>,

    /// Whether the local recognizer can actually be used.
    /// Resolved once at startup; the chain never re-probes.
    pub local_available: bool,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration, optionally overriding the persona id
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the persona cannot be found
    pub fn load(persona_override: Option<&str>) -> Result<Self> {
        let fc = file::load_config_file();

        let persona_id = persona_override
            .map(ToString::to_string)
            .or_else(|| std::env::var("VOXFOLIO_PERSONA").ok())
            .or(fc.persona)
            .unwrap_or_else(|| DEFAULT_PERSONA_ID.to_string());
        let persona = Persona::load(&persona_id)?;

        let api_key = std::env::var("VOXFOLIO_API_KEY")
            .or_else(|_| std::env::var("DEEPINFRA_API_KEY"))
            .ok()
            .or(fc.api_keys.deepinfra)
            .ok_or_else(|| {
                Error::Config(
                    "API key required: set VOXFOLIO_API_KEY or DEEPINFRA_API_KEY".to_string(),
                )
            })?;

        let chat = ChatConfig {
            api_key: SecretString::from(api_key),
            base_url: std::env::var("VOXFOLIO_BASE_URL")
                .ok()
                .or(fc.llm.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("VOXFOLIO_CHAT_MODEL")
                .ok()
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            billing_url: std::env::var("VOXFOLIO_BILLING_URL")
                .ok()
                .or(fc.llm.billing_url)
                .unwrap_or_else(|| DEFAULT_BILLING_URL.to_string()),
        };

        let local_model_path = std::env::var("VOXFOLIO_WHISPER_MODEL")
            .ok()
            .or(fc.stt.local_model_path)
            .map(PathBuf::from);
        let local_available = detect_local_stt(local_model_path.as_deref());

        let stt = SttConfig {
            remote_model: std::env::var("VOXFOLIO_STT_MODEL")
                .ok()
                .or(fc.stt.remote_model)
                .unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
            local_model_path,
            local_available,
        };

        let server = ServerConfig {
            port: std::env::var("VOXFOLIO_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            persona,
            chat,
            stt,
            server,
        })
    }
}

/// Probe local recognizer availability once at startup
///
/// The local backend needs both the `local-stt` build feature and a model
/// file on disk. When either is missing the chain starts at the remote
/// backend instead.
fn detect_local_stt(model_path: Option<&std::path::Path>) -> bool {
    if !cfg!(feature = "local-stt") {
        tracing::info!("local speech recognition not compiled in, remote transcription only");
        return false;
    }

    match model_path {
        Some(path) if path.exists() => {
            tracing::info!(path = %path.display(), "local Whisper model found");
            true
        }
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "local Whisper model path set but file missing, remote transcription only"
            );
            false
        }
        None => {
            tracing::info!("no local Whisper model configured, remote transcription only");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_path_disables_local_stt() {
        assert!(!detect_local_stt(None));
        assert!(!detect_local_stt(Some(std::path::Path::new(
            "/no/such/model.bin"
        ))));
    }
}
