use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::render::render_response;
use crate::request::RenderParams;
use crate::server::error::{AppError, AppResult};
use crate::server::fields::RequestFields;
use crate::server::state::AppState;

/// Lifetime of a dynamic link when the request names none.
const DEFAULT_TTL_DAYS: i64 = 7;

const QR_ID_HEADER: HeaderName = HeaderName::from_static("x-qr-id");
const QR_EXPIRES_HEADER: HeaderName = HeaderName::from_static("x-qr-expires-at");

/// Response body of `/update-dynamic-qr`.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
    pub qr_id: Uuid,
    pub target_url: String,
    pub expire_at: DateTime<Utc>,
}

/// POST /create-dynamic-qr -- registers a link and renders its resolver URL.
///
/// The image is never cached: every call yields a new link id.
pub async fn create_dynamic_qr(State(state): State<AppState>, fields: RequestFields) -> AppResult<Response> {
    let target_url = fields.required("target_url")?;
    location(&target_url)?;
    let ttl_days = fields.i64("expire_in_days")?.unwrap_or(DEFAULT_TTL_DAYS);

    // Validate before storing; the payload is swapped for the resolver URL
    // once the link id exists.
    let mut request = RenderParams {
        data: Some(target_url.clone()),
        module_style: fields.string("module_style"),
        gradient_type: fields.string("gradient_type"),
        start_color: fields.string("start_color"),
        end_color: fields.string("end_color"),
        size: fields.u32("size")?,
        file: fields.string("file"),
        ..RenderParams::default()
    }
    .into_request(state.config.max_size)?;

    let record = state.links.create(target_url, ttl_days);
    request.payload = state.config.resolver_url(record.id);

    let mut response = render_response(&state, request, false).await?;
    let headers = response.headers_mut();
    headers.insert(QR_ID_HEADER, header_value(&record.id.to_string())?);
    headers.insert(
        QR_EXPIRES_HEADER,
        header_value(&record.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true))?,
    );
    Ok(response)
}

/// GET /redirect/{id} -- 307 to the current target, 404 unknown, 410 expired.
pub async fn redirect(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let target = state.links.resolve(&id)?;
    tracing::debug!(%id, %target, "resolved dynamic link");
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location(&target)?)]).into_response())
}

/// POST /update-dynamic-qr -- retargets a link and optionally extends it.
pub async fn update_dynamic_qr(State(state): State<AppState>, fields: RequestFields) -> AppResult<Json<UpdateResponse>> {
    let qr_id = fields.required("qr_id")?;
    let new_url = fields.required("new_url")?;
    location(&new_url)?;
    let extend_days = fields.i64("extend_days")?.unwrap_or(0);

    let record = state.links.update(&qr_id, new_url, extend_days)?;
    Ok(Json(UpdateResponse {
        message: "Dynamic QR code updated.",
        qr_id: record.id,
        target_url: record.target_url,
        expire_at: record.expires_at,
    }))
}

/// A target must be usable as a `Location` header.
fn location(url: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(url.trim())
        .map_err(|_| AppError::Unprocessable(format!("`{url}` is not a usable redirect target")))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::InternalError(e.to_string()))
}
