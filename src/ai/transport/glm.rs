//! GLM Chat Completions Client
//!
//! One POST to `{api_base}/chat/completions`, returning the raw vendor JSON.
//! Shared by the direct transport and the proxy endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::TransportSettings;
use crate::ai::timeout::{Deadline, within_deadline};
use crate::types::{Result, SlideError, StatusClassifier, TransportError};

/// HTTP client for the vendor's chat completion endpoint
pub struct GlmClient {
    api_base: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for GlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlmClient")
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GlmClient {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| SlideError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            client,
        })
    }

    fn build_request<'a>(&self, model: &'a str, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }

    /// Send one completion request and return the vendor's JSON body.
    pub async fn chat_completion(
        &self,
        api_key: &SecretString,
        model: &str,
        prompt: &str,
        deadline: Deadline,
    ) -> std::result::Result<Value, TransportError> {
        info!(
            "Calling GLM API (model: {}, prompt: {} chars)",
            model,
            prompt.chars().count()
        );

        let start_time = Instant::now();
        let url = format!("{}/chat/completions", self.api_base);
        let request = self.build_request(model, prompt);
        let budget = deadline.budget();

        let body = within_deadline(deadline, async {
            let response = self
                .client
                .post(&url)
                .timeout(deadline.remaining())
                .header(
                    "Authorization",
                    format!("Bearer {}", api_key.expose_secret()),
                )
                .json(&request)
                .send()
                .await
                .map_err(|e| StatusClassifier::classify_reqwest(&e, budget))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                warn!("GLM API error ({}): {}", status, text);
                return Err(StatusClassifier::classify_http_status(status.as_u16(), text));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| TransportError::MalformedResponse(e.to_string()))
        })
        .await?;

        debug!(
            "GLM API responded in {}ms",
            start_time.elapsed().as_millis()
        );

        Ok(body)
    }
}

/// `choices[0].message.content` of a vendor response, if present and non-blank
pub fn message_content(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::trim)
        .filter(|content| !content.is_empty())
}

// Request types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}
