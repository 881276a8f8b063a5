//! Request middleware.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// Require the configured admin bearer token.
///
/// Applied to every mutating route. When no token is configured the
/// mutating surface is closed entirely rather than left open.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.server.admin_token.as_deref() else {
        return unauthorized("Admin token is not configured");
    };

    let presented = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => next.run(request).await,
        _ => unauthorized("Invalid or missing admin token"),
    }
}

fn unauthorized(message: &str) -> Response {
    let body = ApiErrorResponse {
        error: "UNAUTHORIZED".to_string(),
        message: message.to_string(),
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
