pub mod health;
pub mod links;
pub mod render;
pub mod upload;

use axum::routing::{get, post};
use axum::Router;

use crate::server::state::AppState;

/// Build the gated route tree.
///
/// ```text
/// /create-custom-qr        GET, POST   rounded modules, solid colors
/// /create-transparent-qr   GET, POST   gapped modules, light pixels stripped
/// /create-advanced-qr      POST        module style, gradient, caption
/// /generate-qr             GET, POST   every render option
/// /create-dynamic-qr       POST        new dynamic link + its image
/// /redirect/{id}           GET         follow a dynamic link
/// /update-dynamic-qr       POST        retarget / extend a dynamic link
/// /upload-image            POST        echo an upload as hex
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-custom-qr",
            get(render::create_custom_qr).post(render::create_custom_qr),
        )
        .route(
            "/create-transparent-qr",
            get(render::create_transparent_qr).post(render::create_transparent_qr),
        )
        .route("/create-advanced-qr", post(render::create_advanced_qr))
        .route(
            "/generate-qr",
            get(render::generate_qr).post(render::generate_qr),
        )
        .route("/create-dynamic-qr", post(links::create_dynamic_qr))
        .route("/redirect/{id}", get(links::redirect))
        .route("/update-dynamic-qr", post(links::update_dynamic_qr))
        .route("/upload-image", post(upload::upload_image))
}
