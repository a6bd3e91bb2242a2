//! Pixel canvas types shared by the rasterizer and the layer pipeline.

use image::RgbaImage;

/// A rectangle defined in pixel coordinates.
///
/// Used to mark where the symbol sits inside a canvas that may have been
/// extended (for example by a caption strip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Top-left position that centers a `w x h` box inside this rectangle.
    pub fn centered(&self, w: u32, h: u32) -> (i32, i32) {
        (
            self.x as i32 + (self.width as i32 - w as i32) / 2,
            self.y as i32 + (self.height as i32 - h as i32) / 2,
        )
    }
}

/// An RGBA image together with the region occupied by the symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    /// The image data in RGBA format.
    pub data: RgbaImage,

    /// The region that holds the symbol itself. Equals the full image until
    /// a layer extends the canvas.
    pub symbol_bounds: RectPx,
}

impl Canvas {
    /// Creates a canvas whose symbol covers the whole image.
    pub fn new(data: RgbaImage) -> Self {
        let symbol_bounds = RectPx::from_size(data.width(), data.height());
        Self {
            data,
            symbol_bounds,
        }
    }

    /// Returns `(width, height)` of the image.
    pub fn dimensions(&self) -> (u32, u32) {
        self.data.dimensions()
    }

    /// Consumes the canvas, returning the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
    }

    #[test]
    fn centered_uses_integer_halves() {
        let rect = RectPx::from_size(400, 400);
        assert_eq!(rect.centered(80, 80), (160, 160));
        assert_eq!(rect.centered(81, 81), (159, 159));
    }

    #[test]
    fn new_canvas_bounds_cover_image() {
        let canvas = Canvas::new(RgbaImage::new(30, 30));
        assert_eq!(canvas.symbol_bounds, RectPx::from_size(30, 30));
        assert_eq!(canvas.dimensions(), (30, 30));
    }
}
