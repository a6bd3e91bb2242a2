//! Raster composition: symbol matrix plus style to a finished RGBA image.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::canvas::Canvas;
use crate::layer::{CaptionConfig, LayerPipeline, LogoOverlayConfig, TransparencyConfig};
use crate::logo::{Logo, LogoError};
use crate::raster::rasterize;
use crate::style::StyleSpec;
use crate::symbol::SymbolMatrix;

// ============================================================================
// Composition
// ============================================================================

/// Produces the final raster for one request.
///
/// # Pipeline
///
/// 1. **Rasterize** the matrix with `style` at the native module size
/// 2. **Resize** to `size x size` (nearest-neighbor for square modules so
///    edges stay crisp, Catmull-Rom for every other shape)
/// 3. **Logo** centered on the symbol, when `logo` is `Some(Ok(_))`
/// 4. **Caption** strip below the symbol, when `caption` is non-empty
/// 5. **Transparency** stripping of light pixels, when `transparent`
///
/// A failed logo (`Some(Err(_))`) is logged and skipped. Nothing in this
/// function fails.
pub fn composite(
    matrix: &SymbolMatrix,
    style: &StyleSpec,
    size: u32,
    logo: Option<Result<Logo, LogoError>>,
    caption: Option<&str>,
    transparent: bool,
) -> RgbaImage {
    let native = rasterize(matrix, style);
    let size = size.max(1);
    let filter = if style.module_shape.is_pixel_exact() {
        FilterType::Nearest
    } else {
        FilterType::CatmullRom
    };
    let resized = imageops::resize(&native, size, size, filter);

    let pipeline = LayerPipeline {
        logo: logo.and_then(|result| match result {
            Ok(logo) => Some(LogoOverlayConfig::new(logo)),
            Err(err) => {
                tracing::warn!(error = %err, "logo unavailable, rendering without it");
                None
            }
        }),
        caption: caption
            .filter(|text| !text.is_empty())
            .map(|text| CaptionConfig::new(text, size)),
        transparency: transparent.then(TransparencyConfig::default),
    };

    pipeline.render(Canvas::new(resized)).into_image()
}
