use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::error_response;
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct ParseSlidesRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// `POST /api/parse-slides`
///
/// The pipeline runs in its own task so a panic inside it becomes a 500
/// instead of a dropped connection.
#[tracing::instrument(skip(state, payload))]
pub async fn parse_slides_handler(
    State(state): State<AppState>,
    payload: Result<Json<ParseSlidesRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected parse request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                rejection.body_text(),
            );
        }
    };

    let text = request.text.unwrap_or_default();
    let orchestrator = Arc::clone(&state.orchestrator);
    let task = tokio::spawn(async move { orchestrator.parse(&text).await });

    match task.await {
        Ok(Ok(outcome)) => {
            tracing::info!(
                slides = outcome.count,
                used_ai = outcome.metadata.used_ai,
                "Parse successful"
            );
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Ok(Err(e)) if e.is_client_error() => {
            error_response(StatusCode::BAD_REQUEST, &e.user_message(), e.to_string())
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Parse failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.user_message(),
                e.to_string(),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Parse task aborted");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Parsing failed, please try again later",
                e.to_string(),
            )
        }
    }
}
