//! Outbound chat-completion calls
//!
//! One normalized call per provider wire format. Every failure mode a
//! single call can hit (transport error, non-success status, missing text
//! in the payload) maps to a [`ProviderError`]; the orchestrator treats
//! them all the same way and moves on to the next provider.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use super::{ProviderConfig, ProviderKind};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const USER_AGENT: &str = concat!("aura-gw/", env!("CARGO_PKG_VERSION"));
const MAX_REPLY_TOKENS: u32 = 300;

/// Persona framing sent with every relayed message. Replies must stay
/// short enough to be spoken aloud by the client.
const SYSTEM_PROMPT: &str = "You are AURA, a warm and concise personal assistant \
that speaks its replies aloud. Answer in at most three short sentences.";

/// Single provider call errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {0}")]
    Api(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// One outbound chat-completion call, normalized to plain reply text.
#[async_trait]
pub trait Completions: Send + Sync {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        api_key: &str,
        message: &str,
    ) -> Result<String, ProviderError>;
}

/// Production transport over HTTPS
pub struct HttpCompletions {
    http: reqwest::Client,
}

impl HttpCompletions {
    /// Build the shared HTTP client with an explicit per-request timeout.
    pub fn new(timeout: Duration) -> aura_common::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    async fn post_json(
        &self,
        request: reqwest::RequestBuilder,
        body: Value,
    ) -> Result<Value, ProviderError> {
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

/// Pull the reply text out of a parsed payload, rejecting empty text.
fn extract_text(payload: &Value, pointer: &str) -> Result<String, ProviderError> {
    let text = payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::MalformedResponse(format!("no text at {}", pointer)))?;
    Ok(text.to_string())
}

#[async_trait]
impl Completions for HttpCompletions {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        api_key: &str,
        message: &str,
    ) -> Result<String, ProviderError> {
        tracing::debug!(provider = provider.kind.id(), model = %provider.model, "calling provider");

        let text = match provider.kind {
            ProviderKind::OpenAi => {
                let body = json!({
                    "model": provider.model,
                    "max_tokens": MAX_REPLY_TOKENS,
                    "messages": [
                        {"role": "system", "content": SYSTEM_PROMPT},
                        {"role": "user", "content": message},
                    ],
                });
                let payload = self
                    .post_json(self.http.post(OPENAI_URL).bearer_auth(api_key), body)
                    .await?;
                extract_text(&payload, "/choices/0/message/content")?
            }
            ProviderKind::Anthropic => {
                let body = json!({
                    "model": provider.model,
                    "max_tokens": MAX_REPLY_TOKENS,
                    "system": SYSTEM_PROMPT,
                    "messages": [
                        {"role": "user", "content": message},
                    ],
                });
                let request = self
                    .http
                    .post(ANTHROPIC_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION);
                let payload = self.post_json(request, body).await?;
                extract_text(&payload, "/content/0/text")?
            }
            ProviderKind::Gemini => {
                let url = format!(
                    "{}/{}:generateContent?key={}",
                    GEMINI_BASE_URL, provider.model, api_key
                );
                let body = json!({
                    "contents": [
                        {"parts": [{"text": format!("{}\n\n{}", SYSTEM_PROMPT, message)}]},
                    ],
                });
                let payload = self.post_json(self.http.post(&url), body).await?;
                extract_text(&payload, "/candidates/0/content/parts/0/text")?
            }
        };

        tracing::info!(
            provider = provider.kind.id(),
            reply_len = text.len(),
            "provider reply received"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpCompletions::new(Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn extract_text_finds_openai_shape() {
        let payload = json!({
            "choices": [{"message": {"role": "assistant", "content": "hello there"}}]
        });
        let text = extract_text(&payload, "/choices/0/message/content").unwrap();
        assert_eq!(text, "hello there");
    }

    #[test]
    fn extract_text_rejects_missing_field() {
        let payload = json!({"choices": []});
        let err = extract_text(&payload, "/choices/0/message/content").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn extract_text_rejects_empty_text() {
        let payload = json!({"content": [{"text": "   "}]});
        let err = extract_text(&payload, "/content/0/text").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
