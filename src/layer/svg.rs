//! SVG rasterization and alpha compositing helpers built on resvg/usvg.
//!
//! Shared by the caption layer (text is laid out and rasterized through an
//! SVG document so glyph shaping comes from the system font database) and by
//! the logo layer (source-over blending).

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};

// ============================================================================
// Font Database
// ============================================================================

static FONT_DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// Returns the process-wide font database, loading system fonts on first
/// use. The database may be empty on hosts without fonts.
pub fn font_database() -> Arc<fontdb::Database> {
    FONT_DB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Parses an SVG document, resolving text against [`font_database`].
///
/// Returns `None` if the document cannot be parsed.
pub fn parse_svg(svg_data: &str) -> Option<Tree> {
    let opts = Options {
        fontdb: font_database(),
        ..Default::default()
    };
    Tree::from_str(svg_data, &opts).ok()
}

/// Renders a parsed tree into a `width x height` RGBA image with the given
/// transform applied.
///
/// Returns `None` if either dimension is zero.
pub fn render_tree(tree: &Tree, width: u32, height: u32, transform: Transform) -> Option<RgbaImage> {
    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(tree, transform, &mut pixmap.as_mut());
    straight_alpha(&pixmap)
}

/// Copies a premultiplied pixmap into a straight-alpha image.
fn straight_alpha(pixmap: &Pixmap) -> Option<RgbaImage> {
    let raw = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
}

/// Escapes text for use inside an XML element.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// Compositing
// ============================================================================

/// Draws `src` over `dest` with its top-left corner at `(x, y)`.
///
/// Only the overlapping region is touched, so `src` may hang off any edge.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (x, y) = (i64::from(x), i64::from(y));
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + i64::from(src.width())).min(i64::from(dest.width()));
    let bottom = (y + i64::from(src.height())).min(i64::from(dest.height()));

    for dy in top..bottom {
        for dx in left..right {
            let over = *src.get_pixel((dx - x) as u32, (dy - y) as u32);
            let under = dest.get_pixel_mut(dx as u32, dy as u32);
            *under = source_over(over, *under);
        }
    }
}

/// Straight-alpha source-over for one pixel.
fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => dst,
        255 => src,
        alpha => {
            let sa = f32::from(alpha) / 255.0;
            let da = f32::from(dst[3]) / 255.0 * (1.0 - sa);
            let out = sa + da;
            let mix = |s: u8, d: u8| ((f32::from(s) * sa + f32::from(d) * da) / out).round() as u8;
            Rgba([
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                (out * 255.0).round() as u8,
            ])
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
