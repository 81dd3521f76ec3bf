//! TOML configuration file loading
//!
//! Supports `~/.config/voxfolio/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VoxfolioConfigFile {
    /// Persona identifier (e.g. "personality" or "resume")
    #[serde(default)]
    pub persona: Option<String>,

    /// Chat completion configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Transcription configuration
    #[serde(default)]
    pub stt: SttFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Chat-completion configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier sent to the chat endpoint
    pub model: Option<String>,

    /// OpenAI-compatible base URL
    pub base_url: Option<String>,

    /// Billing page shown in insufficient-balance errors
    pub billing_url: Option<String>,
}

/// Transcription configuration
#[derive(Debug, Default, Deserialize)]
pub struct SttFileConfig {
    /// Remote transcription model (e.g. "whisper-1")
    pub remote_model: Option<String>,

    /// Path to a local Whisper GGML model file
    pub local_model_path: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    /// DeepInfra (or other OpenAI-compatible provider) API key
    pub deepinfra: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VoxfolioConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
pub fn load_config_file() -> VoxfolioConfigFile {
    let Some(path) = config_file_path() else {
        return VoxfolioConfigFile::default();
    };

    if !path.exists() {
        return VoxfolioConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VoxfolioConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VoxfolioConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voxfolio/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voxfolio").join("config.toml"))
}
