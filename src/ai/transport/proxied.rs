//! Proxied vendor transport
//!
//! Posts `{ apiKey, model, content }` to the intermediary endpoint and unwraps
//! `{ success, data }` where `data` is the vendor's own response.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::glm::message_content;
use super::{CompletionRequest, LlmTransport, TransportKind, TransportSettings};
use crate::ai::timeout::within_deadline;
use crate::types::{Result, SlideError, StatusClassifier, TransportError};

/// Calls the vendor through the proxy endpoint
#[derive(Debug)]
pub struct ProxiedTransport {
    proxy_url: String,
    client: reqwest::Client,
}

impl ProxiedTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| SlideError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            proxy_url: settings.proxy_url.clone(),
            client,
        })
    }
}

#[async_trait]
impl LlmTransport for ProxiedTransport {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> std::result::Result<String, TransportError> {
        debug!("Calling GLM through proxy at {}", self.proxy_url);

        let body = ProxyRequest {
            api_key: request.api_key.expose_secret(),
            model: request.model,
            content: request.prompt,
        };
        let deadline = request.deadline;
        let budget = deadline.budget();

        let reply: ProxyReply = within_deadline(deadline, async {
            let response = self
                .client
                .post(&self.proxy_url)
                .timeout(deadline.remaining())
                .json(&body)
                .send()
                .await
                .map_err(|e| StatusClassifier::classify_reqwest(&e, budget))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                warn!("GLM proxy call failed ({}): {}", status, text);
                return Err(StatusClassifier::classify_http_status(status.as_u16(), text));
            }

            response
                .json::<ProxyReply>()
                .await
                .map_err(|e| TransportError::MalformedResponse(e.to_string()))
        })
        .await?;

        if !reply.success {
            return Err(TransportError::MalformedResponse(format!(
                "proxy reported failure: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        reply
            .data
            .as_ref()
            .and_then(message_content)
            .map(str::to_string)
            .ok_or_else(|| {
                TransportError::MalformedResponse("no message content in proxy response".to_string())
            })
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Proxied
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyRequest<'a> {
    api_key: &'a str,
    model: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProxyReply {
    #[serde(default)]
    success: bool,
    data: Option<Value>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::timeout::Deadline;
    use crate::ai::transport::test_support::spawn_stub;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::post;
    use secrecy::SecretString;
    use serde_json::json;
    use std::time::Duration;

    fn transport_for(url: String) -> ProxiedTransport {
        ProxiedTransport::new(&TransportSettings {
            proxy_url: url,
            ..TransportSettings::default()
        })
        .unwrap()
    }

    async fn complete_with(
        transport: &ProxiedTransport,
        budget: Duration,
    ) -> std::result::Result<String, TransportError> {
        let key = SecretString::from("sk-test".to_string());
        transport
            .complete(&CompletionRequest {
                api_key: &key,
                model: "glm-4.5",
                prompt: "hello",
                deadline: Deadline::after(budget),
            })
            .await
    }

    #[tokio::test]
    async fn test_unwraps_proxy_success() {
        let router = axum::Router::new().route(
            "/api/proxy/glm",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["apiKey"], "sk-test");
                assert_eq!(body["model"], "glm-4.5");
                assert_eq!(body["content"], "hello");
                Json(json!({
                    "success": true,
                    "data": {"choices": [{"message": {"content": "[{\"title\":\"A\"}]"}}]}
                }))
            }),
        );
        let base = spawn_stub(router).await;
        let transport = transport_for(format!("{}/api/proxy/glm", base));

        let text = complete_with(&transport, Duration::from_secs(5)).await.unwrap();
        assert_eq!(text, r#"[{"title":"A"}]"#);
    }

    #[tokio::test]
    async fn test_passes_through_rate_limit_status() {
        let router = axum::Router::new().route(
            "/api/proxy/glm",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"success": false, "error": "slow down", "status": 429})),
                )
            }),
        );
        let base = spawn_stub(router).await;
        let transport = transport_for(format!("{}/api/proxy/glm", base));

        let err = complete_with(&transport, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::RateLimited);
    }

    #[tokio::test]
    async fn test_unsuccessful_reply_is_malformed() {
        let router = axum::Router::new().route(
            "/api/proxy/glm",
            post(|| async { Json(json!({"success": false, "error": "upstream broke"})) }),
        );
        let base = spawn_stub(router).await;
        let transport = transport_for(format!("{}/api/proxy/glm", base));

        let err = complete_with(&transport, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse(msg) if msg.contains("upstream broke")));
    }

    #[tokio::test]
    async fn test_slow_proxy_times_out() {
        let router = axum::Router::new().route(
            "/api/proxy/glm",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"success": true}))
            }),
        );
        let base = spawn_stub(router).await;
        let transport = transport_for(format!("{}/api/proxy/glm", base));

        let err = complete_with(&transport, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_network_error() {
        // port 9 (discard) is not served by anything in the test environment
        let transport = transport_for("http://127.0.0.1:9/api/proxy/glm".to_string());

        let err = complete_with(&transport, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::NetworkError(_)));
    }
}
