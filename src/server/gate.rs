//! Access gate middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::AppError;
use super::state::AppState;

/// Paths reachable without the gate header.
const OPEN_PATHS: &[&str] = &["/", "/ping"];

/// Rejects requests that lack the configured gate header with 403.
pub async fn require_gate_header(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if OPEN_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    if let Some(name) = state.config.gate_header_name() {
        let present = request
            .headers()
            .get(&name)
            .is_some_and(|value| !value.as_bytes().trim_ascii().is_empty());
        if !present {
            tracing::debug!(path = %request.uri().path(), header = %name, "gate header missing");
            return AppError::Forbidden(format!("the `{name}` header is required")).into_response();
        }
    }

    next.run(request).await
}
