mod health;
mod parse;
mod proxy;

pub use health::health_handler;
pub use parse::{ParseSlidesRequest, parse_slides_handler};
pub use proxy::{ProxyGlmRequest, proxy_glm_handler};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure body shared by every endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub details: String,
}

pub(crate) fn error_response(
    status: StatusCode,
    error: &str,
    details: impl Into<String>,
) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.to_string(),
            details: details.into(),
        }),
    )
        .into_response()
}
