//! Error types for the Voxfolio gateway

use thiserror::Error;

/// Result type alias for Voxfolio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Voxfolio gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Persona not found
    #[error("persona not found: {0}")]
    PersonaNotFound(String),

    /// Audio bytes are not a recognizable container/codec
    #[error("could not decode audio: {0}")]
    Decode(String),

    /// Local recognizer could not interpret the audio
    #[error("could not understand the audio, please try speaking more clearly")]
    UnrecognizedSpeech,

    /// Local recognizer missing or its runtime dependency failed
    #[error("speech recognition backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Remote transcription API failure
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Remote API reported insufficient account balance
    #[error(
        "insufficient balance: your account has run out of credit. \
         Add funds at {billing_url} and try again"
    )]
    Billing {
        /// Provider billing page to point the user at
        billing_url: String,
    },

    /// Any other remote-call failure, surfaced verbatim
    #[error("{0}")]
    Api(String),

    /// Audio device or encoding error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether a transcription backend failure should fall through to the
    /// next backend in the chain rather than abort the request
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        matches!(self, Self::UnrecognizedSpeech | Self::BackendUnavailable(_))
    }
}
