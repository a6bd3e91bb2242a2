use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::server::state::AppState;

/// Ping response payload.
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
}

/// Welcome response payload.
#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET / -- static welcome message.
async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Styled QR code API. Render custom, transparent, advanced and dynamic QR codes. \
                  Every route except / and /ping requires the access gate header.",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ping -- liveness probe.
async fn ping() -> Json<PingResponse> {
    Json(PingResponse { status: "ok" })
}

/// Mount the routes that bypass the access gate.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/ping", get(ping))
}
