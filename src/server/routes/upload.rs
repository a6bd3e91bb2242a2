use std::fmt::Write as _;

use axum::Json;
use serde::Serialize;

use crate::server::error::{AppError, AppResult};
use crate::server::fields::RequestFields;

/// Response body of `/upload-image`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: Option<String>,
    /// The uploaded bytes, lowercase hex.
    pub content: String,
}

/// POST /upload-image -- echoes an uploaded file back as hex.
pub async fn upload_image(fields: RequestFields) -> AppResult<Json<UploadResponse>> {
    let upload = fields
        .file("file")
        .ok_or_else(|| AppError::Unprocessable("missing required field `file`".to_string()))?;

    Ok(Json(UploadResponse {
        filename: upload.filename.clone(),
        content: to_hex(&upload.bytes),
    }))
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
