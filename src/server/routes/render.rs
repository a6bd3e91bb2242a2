use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::cache::CacheKey;
use crate::encode::{Base64Body, EncodedImage};
use crate::logo::resolve_logo;
use crate::render::render;
use crate::request::{RenderParams, RenderRequest};
use crate::server::error::{AppError, AppResult};
use crate::server::fields::RequestFields;
use crate::server::state::AppState;

/// Edge length of `/create-transparent-qr` when none is given.
const TRANSPARENT_DEFAULT_SIZE: u32 = 400;

/// GET|POST /create-custom-qr -- rounded modules on a solid background.
pub async fn create_custom_qr(State(state): State<AppState>, fields: RequestFields) -> AppResult<Response> {
    let params = RenderParams {
        data: Some(fields.required("data")?),
        module_style: Some("rounded".to_string()),
        body_color: fields.string("body_color"),
        bg_color: fields.string("bg_color"),
        size: fields.u32("size")?,
        file: fields.string("file"),
        logo_upload: uploaded(&fields, "logo"),
        ..RenderParams::default()
    };
    render_response(&state, params.into_request(state.config.max_size)?, true).await
}

/// GET|POST /create-transparent-qr -- gapped black modules, light pixels stripped.
pub async fn create_transparent_qr(State(state): State<AppState>, fields: RequestFields) -> AppResult<Response> {
    let params = RenderParams {
        data: Some(fields.required("data")?),
        module_style: Some("gapped".to_string()),
        size: Some(fields.u32("size")?.unwrap_or(TRANSPARENT_DEFAULT_SIZE)),
        file: fields.string("file"),
        transparent: true,
        logo_upload: uploaded(&fields, "logo"),
        ..RenderParams::default()
    };
    render_response(&state, params.into_request(state.config.max_size)?, true).await
}

/// POST /create-advanced-qr -- free module style and gradient, optional caption.
pub async fn create_advanced_qr(State(state): State<AppState>, fields: RequestFields) -> AppResult<Response> {
    let params = RenderParams {
        data: Some(fields.required("data")?),
        module_style: fields.string("module_style"),
        gradient_type: fields.string("gradient_type"),
        start_color: fields.string("start_color"),
        end_color: fields.string("end_color"),
        caption: fields.string("caption"),
        size: fields.u32("size")?,
        file: fields.string("file"),
        as_base64: fields.flag("as_base64")?,
        ..RenderParams::default()
    };
    render_response(&state, params.into_request(state.config.max_size)?, true).await
}

/// GET|POST /generate-qr -- every render option in one endpoint.
pub async fn generate_qr(State(state): State<AppState>, fields: RequestFields) -> AppResult<Response> {
    let params = RenderParams {
        data: Some(fields.required("data")?),
        module_style: fields.string("module_style"),
        gradient_type: fields.string("gradient_type"),
        start_color: fields.string("start_color"),
        end_color: fields.string("end_color"),
        body_color: fields.string("body_color"),
        bg_color: fields.string("bg_color"),
        caption: fields.string("caption"),
        size: fields.u32("size")?,
        file: fields.string("file"),
        as_base64: fields.flag("as_base64")?,
        transparent: fields.flag("transparent")?,
        logo_url: fields.string("logo_url"),
        logo_upload: uploaded(&fields, "logo"),
    };
    render_response(&state, params.into_request(state.config.max_size)?, true).await
}

fn uploaded(fields: &RequestFields, name: &str) -> Option<Vec<u8>> {
    fields.file(name).map(|upload| upload.bytes.to_vec())
}

// ============================================================================
// Shared rendering
// ============================================================================

/// Renders `request` and turns the result into a response.
///
/// Logos are resolved first, so the cache key can include their content.
/// The render itself runs on the blocking pool. Nothing is cached when
/// `cacheable` is false or when the logo failed to load.
pub(crate) async fn render_response(state: &AppState, request: RenderRequest, cacheable: bool) -> AppResult<Response> {
    let logo = match &request.logo {
        Some(source) if !request.format.is_vector() => {
            Some(resolve_logo(&state.http, source, state.config.fetch_limits()).await)
        }
        _ => None,
    };

    let cache_key = match &logo {
        Some(Err(_)) => None,
        Some(Ok(logo)) => cacheable.then(|| CacheKey::new(&request, Some(logo))),
        None => cacheable.then(|| CacheKey::new(&request, None)),
    };

    if let Some(hit) = cache_key.as_ref().and_then(|key| state.cache.get(key)) {
        tracing::debug!(payload = %request.payload, "render cache hit");
        return Ok(encoded_response(hit));
    }

    let encoded = tokio::task::spawn_blocking(move || render(&request, logo))
        .await
        .map_err(|e| AppError::InternalError(format!("render task failed: {e}")))??;

    if let Some(key) = cache_key {
        state.cache.insert(key, encoded.clone());
    }

    Ok(encoded_response(encoded))
}

/// Writes encoded output as a binary body or a `{"base64": ...}` object.
pub(crate) fn encoded_response(encoded: EncodedImage) -> Response {
    match encoded {
        EncodedImage::Binary { bytes, content_type } => {
            let content_type = HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("image/png"));
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        EncodedImage::Base64(base64) => Json(Base64Body { base64 }).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_content_type_falls_back_to_png() {
        let response = encoded_response(EncodedImage::Binary {
            bytes: vec![1, 2, 3],
            content_type: "image/bad\nlabel".to_string(),
        });
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[test]
    fn base64_is_served_as_json() {
        let response = encoded_response(EncodedImage::Base64("AAAA".to_string()));
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
