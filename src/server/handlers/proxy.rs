use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

use super::error_response;
use crate::ai::timeout::Deadline;
use crate::server::state::AppState;
use crate::types::{TransportError, char_len};

/// Body of `POST /api/proxy/glm`. Deliberately not `Debug`: it holds the key.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyGlmRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// `POST /api/proxy/glm`
///
/// Forwards one completion call to the vendor and hands back its raw JSON.
/// Vendor status codes pass through unchanged.
#[tracing::instrument(skip(state, payload))]
pub async fn proxy_glm_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProxyGlmRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                rejection.body_text(),
            );
        }
    };

    let Some(api_key) = request
        .api_key
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "API key is required",
            "apiKey is missing or blank",
        );
    };
    let Some(content) = request.content.filter(|c| !c.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Content is required",
            "content is missing or empty",
        );
    };
    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.default_model.clone());

    tracing::debug!(model = %model, content_chars = char_len(&content), "Proxying GLM call");

    let started = Instant::now();
    let deadline = Deadline::after(state.vendor_timeout);
    let result = state
        .vendor
        .chat_completion(&api_key, &model, &content, deadline)
        .await;
    let response_time = started.elapsed().as_millis() as u64;

    match result {
        Ok(data) => {
            tracing::info!(response_time_ms = response_time, "GLM proxy call succeeded");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": data,
                    "metadata": {
                        "responseTime": response_time,
                        "model": model,
                        "contentLength": char_len(&content),
                    }
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "GLM proxy call failed");
            vendor_failure(&e)
        }
    }
}

fn vendor_failure(err: &TransportError) -> Response {
    if let Some(status) = err.http_status() {
        let error = match status {
            401 => "GLM API key is invalid or expired",
            429 => "GLM API rate limit reached, please retry later",
            500 => "GLM server error, please retry later",
            _ => "GLM API call failed",
        };
        let details = match err {
            TransportError::ServerError { body, .. } => body.clone(),
            other => other.to_string(),
        };
        let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);

        return (
            code,
            Json(json!({
                "success": false,
                "error": error,
                "details": details,
                "status": status,
            })),
        )
            .into_response();
    }

    let error = match err {
        TransportError::NetworkError(_) => "Network connection failed, cannot reach the GLM API",
        TransportError::Timeout(_) => "Request timed out, please retry later",
        _ => "GLM proxy error",
    };
    error_response(StatusCode::INTERNAL_SERVER_ERROR, error, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_vendor_status_passes_through() {
        let response = vendor_failure(&TransportError::RateLimited);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 429);
        assert_eq!(body["error"], "GLM API rate limit reached, please retry later");
    }

    #[tokio::test]
    async fn test_server_error_keeps_vendor_body() {
        let response = vendor_failure(&TransportError::ServerError {
            status: 503,
            body: "maintenance".to_string(),
        });
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["details"], "maintenance");
        assert_eq!(body["error"], "GLM API call failed");
    }

    #[tokio::test]
    async fn test_network_failure_is_500() {
        let response = vendor_failure(&TransportError::NetworkError("refused".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Network connection failed, cannot reach the GLM API"
        );
    }
}
