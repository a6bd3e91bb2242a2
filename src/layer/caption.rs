//! Caption layer: a line of text below the symbol.
//!
//! The text is laid out by usvg against the system font database, which
//! gives both the glyph outlines and a real bounding box to size the strip.
//! Hosts without fonts still get the strip, sized by the font size alone.

use image::RgbaImage;
use image::imageops;
use resvg::tiny_skia::Transform;

use super::svg::{composite_over, escape_xml, parse_svg, render_tree};
use super::{LayerEffect, RenderContext};
use crate::canvas::Canvas;

/// Font size as a percentage of the symbol edge.
const FONT_SIZE_PERCENT: u32 = 6;

/// Extra strip height beyond the text, split as `TOP_MARGIN` above the text
/// and the rest below.
const STRIP_MARGIN: u32 = 10;
const TOP_MARGIN: u32 = 5;

// ============================================================================
// CaptionConfig
// ============================================================================

/// Configuration for a caption strip.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionConfig {
    /// The caption text. Drawn on a single line.
    pub text: String,

    /// Font size in pixels.
    pub font_size: u32,
}

impl CaptionConfig {
    /// Creates a caption sized for a symbol of `symbol_size` pixels.
    pub fn new(text: impl Into<String>, symbol_size: u32) -> Self {
        Self {
            text: text.into(),
            font_size: (symbol_size * FONT_SIZE_PERCENT / 100).max(1),
        }
    }

    fn svg_document(&self, width: u32) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text x="{x}" y="{size}" font-family="sans-serif" font-size="{size}" text-anchor="middle" fill="#000000">{text}</text></svg>"##,
            height = self.font_size * 2,
            x = width as f32 / 2.0,
            size = self.font_size,
            text = escape_xml(&self.text),
        )
    }

    /// Lays out the text and returns its rendered glyphs, trimmed to the
    /// text's vertical extent. `None` if no font could shape it.
    fn render_text(&self, width: u32) -> Option<RgbaImage> {
        let tree = parse_svg(&self.svg_document(width))?;
        if !tree.root().has_children() {
            return None;
        }

        let bbox = tree.root().abs_bounding_box();
        let text_height = bbox.height().ceil() as u32;
        if text_height == 0 {
            return None;
        }

        render_tree(
            &tree,
            width,
            text_height,
            Transform::from_translate(0.0, -bbox.y()),
        )
    }
}

impl LayerEffect for CaptionConfig {
    fn name(&self) -> &'static str {
        "caption"
    }

    fn transform(&self, ctx: &mut RenderContext) {
        let (width, height) = ctx.canvas.dimensions();
        let glyphs = self.render_text(width);
        let text_height = glyphs.as_ref().map_or(self.font_size, |g| g.height());

        if glyphs.is_none() {
            tracing::debug!(text = %self.text, "caption not shaped, reserving strip only");
        }

        let mut extended = RgbaImage::new(width, height + text_height + STRIP_MARGIN);
        imageops::replace(&mut extended, &ctx.canvas.data, 0, 0);

        if let Some(glyphs) = glyphs {
            composite_over(&mut extended, &glyphs, 0, (height + TOP_MARGIN) as i32);
        }

        ctx.canvas = Canvas {
            data: extended,
            symbol_bounds: ctx.canvas.symbol_bounds,
        };
    }
}
