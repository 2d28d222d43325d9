//! Greeting, metrics and fallback handlers.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::super::SharedState;
use super::super::types::{ErrorResponse, MessageResponse};

/// GET /api - Greeting.
pub(crate) async fn root(State(state): State<SharedState>) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "{} Automation Hub API",
        state.brand_name
    )))
}

/// GET /metrics - Prometheus text exposition.
pub(crate) async fn metrics(State(state): State<SharedState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => not_found().await.into_response(),
    }
}

/// Any unmatched route.
pub(crate) async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: "Not Found".to_string(),
        }),
    )
}
