//! Output formats and encoding of composited images.

mod pdf;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::webp::WebPEncoder;
use image::{ImageFormat, RgbaImage};
use serde::Serialize;

use crate::error::RenderResult;
use crate::symbol::encode_svg;

pub use pdf::write_pdf;

// ============================================================================
// OutputFormat
// ============================================================================

/// The encoding requested for a render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Webp,
    Pdf,
    /// Vector output of the bare symbol.
    Svg,
    /// PNG bytes returned as base64 inside JSON.
    Base64Png,
    /// An unknown label. Encoded as PNG, labelled `image/{label}`.
    Unrecognized(String),
}

impl OutputFormat {
    /// Picks the output format from the `file` field and the base64 flag.
    ///
    /// Explicit `svg`, `pdf` and `webp` take precedence over `as_base64`,
    /// which in turn wins over `png` or any other label.
    pub fn select(file: &str, as_base64: bool) -> Self {
        let label = file.trim();
        match label.to_ascii_lowercase().as_str() {
            "svg" => Self::Svg,
            "pdf" => Self::Pdf,
            "webp" => Self::Webp,
            _ if as_base64 => Self::Base64Png,
            "png" | "" => Self::Png,
            _ => Self::Unrecognized(label.to_string()),
        }
    }

    /// Returns true if this format bypasses the raster pipeline.
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg)
    }

    /// The content type sent with the encoded bytes.
    pub fn content_type(&self) -> String {
        match self {
            Self::Png | Self::Base64Png => "image/png".to_string(),
            Self::Webp => "image/webp".to_string(),
            Self::Pdf => "application/pdf".to_string(),
            Self::Svg => "image/svg+xml".to_string(),
            Self::Unrecognized(label) => format!("image/{label}"),
        }
    }
}

// ============================================================================
// EncodedImage
// ============================================================================

/// A finished render, ready to be written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedImage {
    /// Raw bytes with their content type.
    Binary { bytes: Vec<u8>, content_type: String },
    /// Base64 text, served as [`Base64Body`].
    Base64(String),
}

impl EncodedImage {
    /// Size of the payload in bytes, for logs.
    pub fn len(&self) -> usize {
        match self {
            Self::Binary { bytes, .. } => bytes.len(),
            Self::Base64(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON body of a base64 response.
#[derive(Debug, Clone, Serialize)]
pub struct Base64Body {
    pub base64: String,
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes `img` as `format`.
///
/// `payload` is only read for [`OutputFormat::Svg`], which re-encodes the
/// text as vector output and ignores `img`.
pub fn encode(img: &RgbaImage, payload: &str, format: &OutputFormat) -> RenderResult<EncodedImage> {
    let content_type = format.content_type();
    let bytes = match format {
        OutputFormat::Svg => return encode_vector(payload),
        OutputFormat::Png | OutputFormat::Unrecognized(_) => encode_png(img)?,
        OutputFormat::Base64Png => return Ok(EncodedImage::Base64(STANDARD.encode(encode_png(img)?))),
        OutputFormat::Webp => encode_webp(img)?,
        OutputFormat::Pdf => write_pdf(img)?,
    };
    Ok(EncodedImage::Binary {
        bytes,
        content_type,
    })
}

/// Encodes `payload` as an SVG document without any raster work.
pub fn encode_vector(payload: &str) -> RenderResult<EncodedImage> {
    Ok(EncodedImage::Binary {
        bytes: encode_svg(payload)?.into_bytes(),
        content_type: OutputFormat::Svg.content_type(),
    })
}

fn encode_png(img: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn encode_webp(img: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_with_encoder(WebPEncoder::new_lossless(&mut bytes))?;
    Ok(bytes)
}
