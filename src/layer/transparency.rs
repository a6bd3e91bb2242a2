//! Luminance-threshold transparency layer.

use super::{LayerEffect, RenderContext};
use crate::color::luminance;

/// Pixels brighter than this become fully transparent.
pub const DEFAULT_LUMINANCE_THRESHOLD: f32 = 180.0;

// ============================================================================
// TransparencyConfig
// ============================================================================

/// Configuration for stripping light pixels.
///
/// Every pixel whose luminance (`0.299R + 0.587G + 0.114B`) is strictly
/// greater than `threshold` gets alpha 0. Color channels are left as they
/// are; all other pixels are untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransparencyConfig {
    pub threshold: f32,
}

impl Default for TransparencyConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LUMINANCE_THRESHOLD,
        }
    }
}

impl LayerEffect for TransparencyConfig {
    fn name(&self) -> &'static str {
        "transparency"
    }

    fn transform(&self, ctx: &mut RenderContext) {
        strip_light_pixels(&mut ctx.canvas.data, self.threshold);
    }
}

/// Applies the luminance rule in place.
pub fn strip_light_pixels(img: &mut image::RgbaImage, threshold: f32) {
    for pixel in img.pixels_mut() {
        if luminance(pixel) > threshold {
            pixel[3] = 0;
        }
    }
}
