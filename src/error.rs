//! Errors produced by the rendering pipeline.

use qrcode::types::QrError;

/// A failure that prevents a render request from producing an image.
///
/// Malformed style input never reaches this type: colors and names degrade
/// to defaults during resolution.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The payload could not be encoded into a symbol (usually too long).
    #[error("payload cannot be encoded as a QR symbol: {0}")]
    Symbol(#[from] QrError),

    /// A field the request cannot do without is absent or empty.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The requested output edge length is outside the accepted range.
    #[error("size must be between 1 and {max} pixels, got {size}")]
    InvalidSize { size: u32, max: u32 },

    /// Raster encoding failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// Writing an output container failed.
    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the rendering modules.
pub type RenderResult<T> = Result<T, RenderError>;
