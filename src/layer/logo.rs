//! Logo overlay layer.

use image::imageops::{self, FilterType};

use super::svg::composite_over;
use super::{LayerEffect, RenderContext};
use crate::logo::Logo;

/// Default logo edge length relative to the symbol edge.
pub const DEFAULT_LOGO_SCALE: f32 = 0.2;

// ============================================================================
// LogoOverlayConfig
// ============================================================================

/// Configuration for a logo centered on the symbol.
///
/// The logo is stretched to a square whose edge is `scale` times the
/// symbol's width, then blended source-over onto the canvas.
#[derive(Debug, Clone)]
pub struct LogoOverlayConfig {
    /// The decoded logo.
    pub logo: Logo,

    /// Edge length relative to the symbol width (0.0-1.0).
    pub scale: f32,
}

impl LogoOverlayConfig {
    /// Creates a config with [`DEFAULT_LOGO_SCALE`].
    pub fn new(logo: Logo) -> Self {
        Self {
            logo,
            scale: DEFAULT_LOGO_SCALE,
        }
    }

    /// Overrides the scale. Values are clamped to 0.0-1.0.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.clamp(0.0, 1.0);
        self
    }
}

impl LayerEffect for LogoOverlayConfig {
    fn name(&self) -> &'static str {
        "logo"
    }

    fn transform(&self, ctx: &mut RenderContext) {
        let bounds = ctx.canvas.symbol_bounds;
        let edge = (bounds.width as f32 * self.scale) as u32;

        if edge == 0 {
            return;
        }

        let resized = imageops::resize(self.logo.image(), edge, edge, FilterType::Lanczos3);
        let (x, y) = bounds.centered(edge, edge);
        composite_over(&mut ctx.canvas.data, &resized, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use image::{Rgba, RgbaImage};

    fn apply(config: &LogoOverlayConfig, side: u32) -> RgbaImage {
        let mut ctx = RenderContext::new(Canvas::new(RgbaImage::from_pixel(
            side,
            side,
            Rgba([255, 255, 255, 255]),
        )));
        config.transform(&mut ctx);
        ctx.canvas.into_image()
    }

    #[test]
    fn logo_is_centered_at_a_fifth_of_the_width() {
        let logo = Logo::from_image(RgbaImage::from_pixel(7, 3, Rgba([255, 0, 0, 255])));
        let out = apply(&LogoOverlayConfig::new(logo), 400);

        // 80x80 logo placed at (160, 160).
        assert_eq!(out.get_pixel(200, 200).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(161, 161).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(238, 238).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(158, 200).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(241, 200).0, [255, 255, 255, 255]);
    }

    #[test]
    fn transparent_logo_pixels_keep_the_symbol() {
        let logo = Logo::from_image(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0])));
        let out = apply(&LogoOverlayConfig::new(logo), 100);
        assert_eq!(out.get_pixel(50, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn tiny_canvas_skips_the_logo() {
        let logo = Logo::from_image(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let out = apply(&LogoOverlayConfig::new(logo), 4);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
