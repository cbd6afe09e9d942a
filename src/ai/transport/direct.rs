//! Direct vendor transport

use async_trait::async_trait;
use tracing::debug;

use super::glm::{GlmClient, message_content};
use super::{CompletionRequest, LlmTransport, TransportKind, TransportSettings};
use crate::types::{Result, TransportError};

/// Calls the vendor API from this process
#[derive(Debug)]
pub struct DirectTransport {
    client: GlmClient,
}

impl DirectTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        Ok(Self {
            client: GlmClient::new(settings)?,
        })
    }
}

#[async_trait]
impl LlmTransport for DirectTransport {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> std::result::Result<String, TransportError> {
        let body = self
            .client
            .chat_completion(
                request.api_key,
                request.model,
                request.prompt,
                request.deadline,
            )
            .await?;

        let content = message_content(&body).ok_or_else(|| {
            TransportError::MalformedResponse("no message content in vendor response".to_string())
        })?;

        debug!("Direct transport received {} chars", content.chars().count());
        Ok(content.to_string())
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::timeout::Deadline;
    use crate::ai::transport::test_support::spawn_stub;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn complete_against(router: axum::Router) -> std::result::Result<String, TransportError> {
        let base = spawn_stub(router).await;
        let transport = DirectTransport::new(&TransportSettings {
            api_base: base,
            ..TransportSettings::default()
        })
        .unwrap();

        let key = SecretString::from("sk-test".to_string());
        transport
            .complete(&CompletionRequest {
                api_key: &key,
                model: "glm-4.5",
                prompt: "split this",
                deadline: Deadline::after(Duration::from_secs(5)),
            })
            .await
    }

    #[tokio::test]
    async fn test_returns_message_content() {
        let router = axum::Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer sk-test" || body["stream"] != json!(false) {
                    return (StatusCode::BAD_REQUEST, Json(json!({})));
                }
                (
                    StatusCode::OK,
                    Json(json!({"choices": [{"message": {"content": " [] "}}]})),
                )
            }),
        );

        assert_eq!(complete_against(router).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let router = axum::Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );

        assert_eq!(
            complete_against(router).await.unwrap_err(),
            TransportError::Unauthorized { status: 401 }
        );
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let router = axum::Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

        assert_eq!(
            complete_against(router).await.unwrap_err(),
            TransportError::ServerError {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let router = axum::Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );

        assert!(matches!(
            complete_against(router).await.unwrap_err(),
            TransportError::MalformedResponse(_)
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let router = axum::Router::new().route(
            "/chat/completions",
            post(|| async { "<html>gateway</html>" }),
        );

        assert!(matches!(
            complete_against(router).await.unwrap_err(),
            TransportError::MalformedResponse(_)
        ));
    }
}
