//! Symbol matrix encoding.
//!
//! Wraps the `qrcode` crate behind an owned boolean grid so the rest of the
//! pipeline never depends on the encoder's types.

use qrcode::render::svg;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::RenderResult;

/// Error-correction level used for every symbol. High correction leaves room
/// for a centered logo to cover part of the modules.
pub const ERROR_CORRECTION: EcLevel = EcLevel::H;

/// A square grid of dark (`true`) and light (`false`) modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl SymbolMatrix {
    /// Encodes `payload` at [`ERROR_CORRECTION`], picking the smallest
    /// version that fits.
    pub fn encode(payload: &str) -> RenderResult<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ERROR_CORRECTION)?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            modules,
        })
    }

    /// Builds a matrix from row-major modules. Returns `None` unless
    /// `modules.len() == width * width`.
    pub fn from_modules(width: usize, modules: Vec<bool>) -> Option<Self> {
        (modules.len() == width * width).then_some(Self { width, modules })
    }

    /// Width (and height) in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns whether the module at `(x, y)` is dark. Coordinates outside
    /// the grid are light, which is what the quiet zone looks like.
    pub fn is_dark(&self, x: isize, y: isize) -> bool {
        let w = self.width as isize;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.modules[(y * w + x) as usize]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }
}

/// Encodes `payload` directly as an SVG document.
///
/// This path has no styling: vector output is always plain dark modules on
/// a light background.
pub fn encode_svg(payload: &str) -> RenderResult<String> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), ERROR_CORRECTION)?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_square_matrix() {
        let matrix = SymbolMatrix::encode("https://example.org").unwrap();
        assert!(matrix.width() >= 21);
        assert_eq!((matrix.width() - 17) % 4, 0, "width is 4 * version + 17");
        assert!(matrix.dark_count() > 0);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = SymbolMatrix::encode("same input").unwrap();
        let b = SymbolMatrix::encode("same input").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn finder_corner_is_dark_and_outside_is_light() {
        let matrix = SymbolMatrix::encode("corner").unwrap();
        assert!(matrix.is_dark(0, 0));
        assert!(!matrix.is_dark(-1, 0));
        assert!(!matrix.is_dark(0, matrix.width() as isize));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = "x".repeat(4000);
        assert!(SymbolMatrix::encode(&payload).is_err());
    }

    #[test]
    fn from_modules_checks_length() {
        assert!(SymbolMatrix::from_modules(2, vec![true; 4]).is_some());
        assert!(SymbolMatrix::from_modules(2, vec![true; 3]).is_none());
    }

    #[test]
    fn svg_output_is_a_document() {
        let svg = encode_svg("vector").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }
}
