//! Rasterization of a symbol matrix with a resolved style.
//!
//! Every module is drawn into a fixed `MODULE_PIXELS` cell, surrounded by a
//! `QUIET_ZONE` border of light modules. Shapes other than full squares are
//! supersampled so their edges blend into the background.

use image::{Rgba, RgbaImage};

use crate::color::mix;
use crate::style::{ModuleShape, StyleSpec};
use crate::symbol::SymbolMatrix;

/// Edge length of one module, in pixels, before the final resize.
pub const MODULE_PIXELS: u32 = 10;

/// Width of the light border around the symbol, in modules.
pub const QUIET_ZONE: u32 = 4;

/// Samples per axis when computing partial coverage of a pixel.
const SUPERSAMPLE: u32 = 4;

/// Shrink factor applied to gapped squares and to bar widths.
const SHRINK: f32 = 0.8;

/// Which orthogonal neighbors of a module are dark.
#[derive(Debug, Clone, Copy, Default)]
struct Neighbors {
    north: bool,
    south: bool,
    east: bool,
    west: bool,
}

impl Neighbors {
    fn of(matrix: &SymbolMatrix, x: isize, y: isize) -> Self {
        Self {
            north: matrix.is_dark(x, y - 1),
            south: matrix.is_dark(x, y + 1),
            east: matrix.is_dark(x + 1, y),
            west: matrix.is_dark(x - 1, y),
        }
    }
}

/// Draws `matrix` with `style` into a new image of
/// `(width + 2 * QUIET_ZONE) * MODULE_PIXELS` pixels per side.
pub fn rasterize(matrix: &SymbolMatrix, style: &StyleSpec) -> RgbaImage {
    let side = (matrix.width() as u32 + 2 * QUIET_ZONE) * MODULE_PIXELS;
    let background = style.background();
    let mut img = RgbaImage::from_pixel(side, side, background);

    let width = matrix.width() as isize;
    for my in 0..width {
        for mx in 0..width {
            if !matrix.is_dark(mx, my) {
                continue;
            }
            let neighbors = Neighbors::of(matrix, mx, my);
            let x0 = (mx as u32 + QUIET_ZONE) * MODULE_PIXELS;
            let y0 = (my as u32 + QUIET_ZONE) * MODULE_PIXELS;
            draw_module(&mut img, style, background, &neighbors, x0, y0, side);
        }
    }

    img
}

fn draw_module(
    img: &mut RgbaImage,
    style: &StyleSpec,
    background: Rgba<u8>,
    neighbors: &Neighbors,
    x0: u32,
    y0: u32,
    side: u32,
) {
    for py in 0..MODULE_PIXELS {
        for px in 0..MODULE_PIXELS {
            let coverage = pixel_coverage(style.module_shape, neighbors, px, py);
            if coverage <= 0.0 {
                continue;
            }
            let (x, y) = (x0 + px, y0 + py);
            let fg = style.foreground_at(x, y, side, side);
            let pixel = if coverage >= 1.0 {
                fg
            } else {
                mix(background, fg, coverage)
            };
            img.put_pixel(x, y, pixel);
        }
    }
}

/// Fraction of pixel `(px, py)` of a module cell covered by the shape.
fn pixel_coverage(shape: ModuleShape, neighbors: &Neighbors, px: u32, py: u32) -> f32 {
    if shape == ModuleShape::Square {
        return 1.0;
    }

    let step = 1.0 / (SUPERSAMPLE * MODULE_PIXELS) as f32;
    let mut hits = 0u32;
    for sy in 0..SUPERSAMPLE {
        for sx in 0..SUPERSAMPLE {
            let u = (px * SUPERSAMPLE + sx) as f32 * step + step / 2.0;
            let v = (py * SUPERSAMPLE + sy) as f32 * step + step / 2.0;
            if covers(shape, neighbors, u, v) {
                hits += 1;
            }
        }
    }
    hits as f32 / (SUPERSAMPLE * SUPERSAMPLE) as f32
}

/// Whether the point `(u, v)` in unit cell coordinates lies inside the shape.
fn covers(shape: ModuleShape, n: &Neighbors, u: f32, v: f32) -> bool {
    let (du, dv) = (u - 0.5, v - 0.5);
    let half = SHRINK / 2.0;
    let in_circle = du * du + dv * dv <= 0.25;

    match shape {
        ModuleShape::Square => true,
        ModuleShape::Gapped => du.abs() <= half && dv.abs() <= half,
        ModuleShape::Circle => in_circle,
        ModuleShape::Rounded => {
            // A corner is only rounded when both neighbors touching it are light.
            let open_h = if du < 0.0 { !n.west } else { !n.east };
            let open_v = if dv < 0.0 { !n.north } else { !n.south };
            !(open_h && open_v) || in_circle
        }
        ModuleShape::VerticalBars => {
            let open_end = if dv < 0.0 { !n.north } else { !n.south };
            du.abs() <= half && (!open_end || in_ellipse(du, dv, half, 0.5))
        }
        ModuleShape::HorizontalBars => {
            let open_end = if du < 0.0 { !n.west } else { !n.east };
            dv.abs() <= half && (!open_end || in_ellipse(du, dv, 0.5, half))
        }
    }
}

fn in_ellipse(du: f32, dv: f32, rx: f32, ry: f32) -> bool {
    (du / rx).powi(2) + (dv / ry).powi(2) <= 1.0
}

// ============================================================================
// Tests
// ============================================================================
