//! Hex color parsing and small color utilities.
//!
//! Client supplied colors are free-form strings. Parsing is total: anything
//! that is not a well formed 3, 4, 6 or 8 digit hex string resolves to opaque
//! black instead of failing the request.

use image::Rgba;
use palette::{Mix, Srgba};
use serde::{Deserialize, Serialize};

// ============================================================================
// ColorSpec
// ============================================================================

/// A parsed color with either three (RGB) or four (RGBA) byte components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpec {
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl ColorSpec {
    /// Opaque black, the fallback for any malformed input.
    pub const BLACK: Self = Self::Rgb([0, 0, 0]);

    /// Opaque white.
    pub const WHITE: Self = Self::Rgb([255, 255, 255]);

    /// Returns the components as a slice of length 3 or 4.
    pub fn components(&self) -> &[u8] {
        match self {
            Self::Rgb(c) => c,
            Self::Rgba(c) => c,
        }
    }

    /// Returns a 4-component color carrying the given alpha.
    pub fn with_alpha(self, alpha: u8) -> Self {
        let [r, g, b, _] = self.to_rgba().0;
        Self::Rgba([r, g, b, alpha])
    }

    /// Converts to an RGBA pixel. RGB colors are fully opaque.
    pub fn to_rgba(self) -> Rgba<u8> {
        match self {
            Self::Rgb([r, g, b]) => Rgba([r, g, b, 255]),
            Self::Rgba(c) => Rgba(c),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::BLACK
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a hex color string such as `#FF0000`, `ff000080` or `#f00`.
///
/// A leading `#` and surrounding whitespace are ignored. Six and eight digit
/// inputs are read as 3 or 4 two-digit groups; three and four digit inputs
/// are read as single-digit groups expanded CSS-style (`f` becomes `ff`).
///
/// When `alpha` is set the result is always a 4-tuple with that alpha.
///
/// Never fails: empty input, a wrong length or a non-hex character yields
/// [`ColorSpec::BLACK`].
pub fn parse_color(input: &str, alpha: Option<u8>) -> ColorSpec {
    let parsed = parse_hex(input).unwrap_or(ColorSpec::BLACK);
    match alpha {
        Some(a) => parsed.with_alpha(a),
        None => parsed,
    }
}

fn parse_hex(input: &str) -> Option<ColorSpec> {
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let (groups, width) = match hex.len() {
        3 => (3, 1),
        4 => (4, 1),
        6 => (3, 2),
        8 => (4, 2),
        _ => return None,
    };

    let mut out = [0u8, 0, 0, 255];
    for (i, slot) in out.iter_mut().take(groups).enumerate() {
        let digits = &hex[i * width..(i + 1) * width];
        let value = u8::from_str_radix(digits, 16).ok()?;
        *slot = if width == 1 { value * 17 } else { value };
    }

    Some(if groups == 4 {
        ColorSpec::Rgba(out)
    } else {
        ColorSpec::Rgb([out[0], out[1], out[2]])
    })
}

// ============================================================================
// Color Utilities
// ============================================================================

/// Perceived brightness on a 0-255 scale (`0.299 R + 0.587 G + 0.114 B`).
pub fn luminance(pixel: &Rgba<u8>) -> f32 {
    0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32
}

/// Linearly interpolates between two colors in sRGB space.
///
/// `t` is clamped to `0.0..=1.0`; `0.0` returns `from`, `1.0` returns `to`.
pub fn mix(from: Rgba<u8>, to: Rgba<u8>, t: f32) -> Rgba<u8> {
    let [r, g, b, a] = from.0;
    let start: Srgba<f32> = Srgba::new(r, g, b, a).into_format();
    let [r, g, b, a] = to.0;
    let end: Srgba<f32> = Srgba::new(r, g, b, a).into_format();

    let mixed: Srgba<u8> = start.mix(end, t.clamp(0.0, 1.0)).into_format();
    Rgba([mixed.red, mixed.green, mixed.blue, mixed.alpha])
}

// ============================================================================
// Tests
// ============================================================================
