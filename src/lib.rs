//! Voxfolio - Voice-driven portfolio chatbot gateway
//!
//! This library provides the core functionality for the Voxfolio gateway:
//! - Audio normalization (arbitrary encoded clips to mono 16 kHz waveform)
//! - Speech-to-text with an ordered local-then-remote fallback chain
//! - Persona-prefixed chat completion against an OpenAI-compatible endpoint
//! - Presentation of answers with a client-side speech-synthesis snippet
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Interfaces                         │
//! │        Web UI (browser)  │  CLI one-shot            │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Voxfolio Gateway                      │
//! │  Normalize  │  STT chain  │  Chat  │  Presenter     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │        OpenAI-compatible hosted endpoint             │
//! │      /audio/transcriptions  │  /chat/completions    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod audio;
pub mod chat;
pub mod config;
pub mod error;
pub mod persona;
pub mod present;
pub mod stt;

pub use chat::{Answer, ChatClient, TokenUsage};
pub use config::Config;
pub use error::{Error, Result};
pub use persona::Persona;
pub use present::AnswerView;
pub use stt::TranscriptionChain;
