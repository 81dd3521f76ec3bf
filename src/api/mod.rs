//! HTTP API server for the Voxfolio gateway
//!
//! Each request is handled independently; the only shared state is the
//! read-only configuration plus stateless API clients.

pub mod health;

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ChatClient;
use crate::present::AnswerView;
use crate::stt::TranscriptionChain;
use crate::{Config, Error, Result, audio};

/// Embedded single-page UI
const INDEX_HTML: &str = include_str!("../../web/index.html");

/// Shared state for API handlers
pub struct ApiState {
    /// Chat completion client
    pub chat: ChatClient,

    /// Speech-to-text fallback chain
    pub stt: TranscriptionChain,

    /// Active persona id
    pub persona_id: String,

    /// Active persona display name
    pub persona_name: String,

    /// Active persona tagline, if any
    pub tagline: Option<String>,
}

impl ApiState {
    /// Build API state from gateway configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            chat: ChatClient::from_config(config),
            stt: TranscriptionChain::from_config(config),
            persona_id: config.persona.id.clone(),
            persona_name: config.persona.name.clone(),
            tagline: config.persona.tagline.clone(),
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server from gateway configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            state: Arc::new(ApiState::from_config(config)),
            port: config.server.port,
        }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/", get(index))
            .route("/api/ask", post(ask))
            .route("/api/transcribe", post(transcribe))
            .with_state(self.state.clone())
            .merge(health::router())
            .merge(health::status_router(self.state.clone()));

        // CORS layer for cross-origin requests from a dev frontend
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// Serve the embedded web UI
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Question submission
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Typed or transcribed question text
    pub question: String,
}

/// Ask the persona a question
async fn ask(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Json<AnswerView>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        // No remote call happens for empty input
        return Err(ApiError::EmptyInput("Please type or speak your question."));
    }

    let answer = state.chat.ask(question).await?;
    Ok(Json(AnswerView::new(question, &answer)))
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Transcribe a recorded clip to text
///
/// Accepts raw audio bytes (WAV or MP3) in the request body
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> std::result::Result<Json<TranscribeResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::EmptyInput("Please record a question first."));
    }

    let clip = audio::normalize(&body)?;
    let text = state.stt.transcribe(&clip).await?;

    Ok(Json(TranscribeResponse { text }))
}

/// User-visible API errors
#[derive(Debug)]
pub enum ApiError {
    /// Nothing to process; the client is told to provide input
    EmptyInput(&'static str),
    /// Anything the gateway itself reported
    Gateway(Error),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Gateway(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::EmptyInput(msg) => (StatusCode::BAD_REQUEST, "empty_input", msg.to_string()),
            Self::Gateway(e) => match e {
                Error::Decode(_) => (StatusCode::BAD_REQUEST, "decode_failed", e.to_string()),
                Error::Billing { .. } => (
                    StatusCode::PAYMENT_REQUIRED,
                    "insufficient_balance",
                    e.to_string(),
                ),
                Error::UnrecognizedSpeech
                | Error::BackendUnavailable(_)
                | Error::Transcription(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "transcription_failed",
                    e.to_string(),
                ),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "api_error",
                    other.to_string(),
                ),
            },
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
