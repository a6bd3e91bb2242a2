//! End-to-end rendering of a validated request.

use crate::compositor::composite;
use crate::encode::{EncodedImage, encode, encode_vector};
use crate::error::RenderResult;
use crate::logo::{Logo, LogoError};
use crate::request::RenderRequest;
use crate::symbol::SymbolMatrix;

/// Renders `request` with an already resolved logo.
///
/// Vector output skips composition entirely, so `logo` is ignored for it.
/// This is CPU bound; async callers should run it on a blocking thread.
pub fn render(request: &RenderRequest, logo: Option<Result<Logo, LogoError>>) -> RenderResult<EncodedImage> {
    if request.format.is_vector() {
        return encode_vector(&request.payload);
    }

    let matrix = SymbolMatrix::encode(&request.payload)?;
    let img = composite(
        &matrix,
        &request.style,
        request.size,
        logo,
        request.caption.as_deref(),
        request.transparent,
    );
    let encoded = encode(&img, &request.payload, &request.format)?;
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        bytes = encoded.len(),
        format = ?request.format,
        "rendered symbol"
    );
    Ok(encoded)
}
