//! Chat completion against the OpenAI-compatible endpoint
//!
//! One question in, one answer out: a fixed persona system message followed
//! by the user's question, submitted in a single blocking call. No retries,
//! no streaming, no conversation state.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::{Error, Result};

/// Marker substring the provider returns when the account balance is gone
const BILLING_MARKER: &str = "Insufficient Balance";

/// Map a failed response body to a billing error when the balance marker is
/// present
pub(crate) fn billing_error(body: &str, billing_url: &str) -> Option<Error> {
    body.contains(BILLING_MARKER).then(|| Error::Billing {
        billing_url: billing_url.to_string(),
    })
}

/// One message in a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// "system" or "user"
    pub role: String,
    /// Message text
    pub content: String,
}

/// Request body for `/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Ordered message list
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Token counts billed by the remote chat API
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input (prompt) tokens
    pub prompt_tokens: u32,
    /// Output (completion) tokens
    pub completion_tokens: u32,
}

/// A generated answer plus its token usage
#[derive(Debug, Clone)]
pub struct Answer {
    /// Generated answer text
    pub text: String,
    /// Token counts reported by the remote service
    pub usage: TokenUsage,
}

/// Build the two-message exchange for a question: fixed persona system
/// message, then the user's question
#[must_use]
pub fn build_request(model: &str, persona_prompt: &str, question: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: persona_prompt.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: question.to_string(),
            },
        ],
    }
}

/// Generates answers via the hosted chat-completion API
pub struct ChatClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    persona_prompt: String,
    billing_url: String,
}

impl ChatClient {
    /// Create a chat client from gateway configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.chat.api_key.clone(),
            base_url: config.chat.base_url.clone(),
            model: config.chat.model.clone(),
            persona_prompt: config.persona.system_prompt.clone(),
            billing_url: config.chat.billing_url.clone(),
        }
    }

    /// The model identifier this client submits
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate an answer for a non-empty question
    ///
    /// # Errors
    ///
    /// Returns [`Error::Billing`] on balance exhaustion, [`Error::Api`] for
    /// any other remote failure
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let request = build_request(&self.model, &self.persona_prompt, question);

        tracing::debug!(model = %self.model, question = %question, "sending chat completion");

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat request failed");
                Error::Api(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat API error");
            if let Some(billing) = billing_error(&body, &self.billing_url) {
                return Err(billing);
            }
            return Err(Error::Api(format!("chat API error {status}: {body}")));
        }

        let body = response.text().await.map_err(|e| Error::Api(e.to_string()))?;
        parse_answer(&body)
    }
}

/// Parse a chat-completion response body into an [`Answer`]
///
/// # Errors
///
/// Returns [`Error::Api`] when the body is not a valid completion response
pub fn parse_answer(body: &str) -> Result<Answer> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Api(format!("malformed chat response: {e}")))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| Error::Api("chat response contained no choices".to_string()))?;

    tracing::info!(
        prompt_tokens = parsed.usage.prompt_tokens,
        completion_tokens = parsed.usage.completion_tokens,
        "answer generated"
    );

    Ok(Answer {
        text,
        usage: TokenUsage {
            prompt_tokens: parsed.usage.prompt_tokens,
            completion_tokens: parsed.usage.completion_tokens,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_exactly_system_then_user() {
        let request = build_request("test-model", "I am the persona.", "What are your hobbies?");

        assert_eq!(request.model, "test-model");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "I am the persona.");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "What are your hobbies?");
    }

    #[test]
    fn billing_marker_maps_to_billing_error() {
        let err = billing_error(
            "{\"error\":\"Insufficient Balance\"}",
            "https://deepinfra.com/billing",
        );
        assert!(matches!(err, Some(Error::Billing { .. })));

        let msg = err.unwrap().to_string();
        assert!(msg.contains("https://deepinfra.com/billing"));
    }

    #[test]
    fn other_failures_are_not_billing() {
        assert!(billing_error("rate limit exceeded", "url").is_none());
    }

    #[test]
    fn parses_answer_and_usage() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "I like football."}}],
            "usage": {"prompt_tokens": 812, "completion_tokens": 25}
        }"#;

        let answer = parse_answer(body).unwrap();
        assert_eq!(answer.text, "I like football.");
        assert_eq!(answer.usage.prompt_tokens, 812);
        assert_eq!(answer.usage.completion_tokens, 25);
    }

    #[test]
    fn empty_choices_is_an_api_error() {
        let body = r#"{"choices": [], "usage": {"prompt_tokens": 1, "completion_tokens": 0}}"#;
        assert!(matches!(parse_answer(body), Err(Error::Api(_))));
    }
}
