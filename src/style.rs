//! Module shape and color gradient resolution.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{ColorSpec, mix, parse_color};

// ============================================================================
// ModuleShape
// ============================================================================

/// The shape each dark module is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleShape {
    #[default]
    Square,
    Rounded,
    Gapped,
    Circle,
    VerticalBars,
    HorizontalBars,
}

impl ModuleShape {
    /// Resolves a client supplied name. Unknown names resolve to
    /// [`ModuleShape::Square`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rounded" => Self::Rounded,
            "gapped" => Self::Gapped,
            "circle" => Self::Circle,
            "vertical" | "vertical-bars" | "vertical_bars" => Self::VerticalBars,
            "horizontal" | "horizontal-bars" | "horizontal_bars" => Self::HorizontalBars,
            _ => Self::Square,
        }
    }

    /// Returns true if modules fill their whole cell, so scaling with
    /// nearest-neighbor keeps every module edge pixel exact.
    pub fn is_pixel_exact(&self) -> bool {
        matches!(self, Self::Square)
    }
}

// ============================================================================
// GradientKind
// ============================================================================

/// How the foreground color is distributed over the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientKind {
    #[default]
    Solid,
    Radial,
    Horizontal,
    Vertical,
}

impl GradientKind {
    /// Resolves a client supplied name. Unknown names resolve to
    /// [`GradientKind::Solid`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "radial" => Self::Radial,
            "horizontal" => Self::Horizontal,
            "vertical" => Self::Vertical,
            _ => Self::Solid,
        }
    }
}

// ============================================================================
// StyleSpec
// ============================================================================

/// A fully resolved rendering style.
///
/// Built once per request and only read afterwards. For the solid gradient
/// `front` paints the modules and `back` the background. For the other
/// gradients the modules blend from `front` to `back` and the background is
/// white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleSpec {
    pub module_shape: ModuleShape,
    pub gradient: GradientKind,
    pub front: ColorSpec,
    pub back: ColorSpec,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            module_shape: ModuleShape::Square,
            gradient: GradientKind::Solid,
            front: ColorSpec::BLACK,
            back: ColorSpec::WHITE,
        }
    }
}

/// Resolves free-form style input into a [`StyleSpec`].
///
/// Never fails; unknown names and malformed colors degrade to their
/// defaults.
pub fn resolve(style_name: &str, gradient_name: &str, front: &str, back: &str) -> StyleSpec {
    StyleSpec {
        module_shape: ModuleShape::from_name(style_name),
        gradient: GradientKind::from_name(gradient_name),
        front: parse_color(front, None),
        back: parse_color(back, None),
    }
}

impl StyleSpec {
    /// Color of the area not covered by any module.
    pub fn background(&self) -> Rgba<u8> {
        match self.gradient {
            GradientKind::Solid => self.back.to_rgba(),
            _ => Rgba([255, 255, 255, 255]),
        }
    }

    /// Module color at pixel `(x, y)` of a `width x height` canvas.
    pub fn foreground_at(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba<u8> {
        let front = self.front.to_rgba();
        let back = self.back.to_rgba();
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);

        match self.gradient {
            GradientKind::Solid => front,
            GradientKind::Radial => {
                let dx = x as f32 - w / 2.0;
                let dy = y as f32 - h / 2.0;
                let max_distance = std::f32::consts::SQRT_2 * w / 2.0;
                mix(front, back, (dx * dx + dy * dy).sqrt() / max_distance)
            }
            GradientKind::Horizontal => mix(front, back, x as f32 / w),
            GradientKind::Vertical => mix(front, back, y as f32 / h),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        let style = resolve("circle", "radial", "#FF0000", "#0000FF");
        assert_eq!(style.module_shape, ModuleShape::Circle);
        assert_eq!(style.gradient, GradientKind::Radial);
        assert_eq!(style.front, ColorSpec::Rgb([255, 0, 0]));
        assert_eq!(style.back, ColorSpec::Rgb([0, 0, 255]));

        assert_eq!(ModuleShape::from_name("Vertical"), ModuleShape::VerticalBars);
        assert_eq!(ModuleShape::from_name(" horizontal "), ModuleShape::HorizontalBars);
        assert_eq!(GradientKind::from_name("VERTICAL"), GradientKind::Vertical);
    }

    #[test]
    fn unknown_names_fall_back_deterministically() {
        for name in ["", "hexagon", "squarish", "🦆"] {
            assert_eq!(ModuleShape::from_name(name), ModuleShape::Square);
            assert_eq!(GradientKind::from_name(name), GradientKind::Solid);
        }
        assert_eq!(
            resolve("zigzag", "plaid", "#000", "#fff"),
            resolve("zigzag", "plaid", "#000", "#fff")
        );
    }

    #[test]
    fn solid_background_uses_back_color() {
        let style = resolve("square", "solid", "#000000", "#00FF00");
        assert_eq!(style.background(), Rgba([0, 255, 0, 255]));
        assert_eq!(style.foreground_at(3, 3, 10, 10), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn gradients_use_white_background_and_blend_modules() {
        let style = resolve("square", "horizontal", "#FF0000", "#0000FF");
        assert_eq!(style.background(), Rgba([255, 255, 255, 255]));
        assert_eq!(style.foreground_at(0, 5, 100, 100), Rgba([255, 0, 0, 255]));
        let right = style.foreground_at(99, 5, 100, 100);
        assert!(right[2] > 240 && right[0] < 15);
    }

    #[test]
    fn radial_center_is_front_color() {
        let style = resolve("square", "radial", "#FF0000", "#0000FF");
        assert_eq!(style.foreground_at(50, 50, 100, 100), Rgba([255, 0, 0, 255]));
        let corner = style.foreground_at(0, 0, 100, 100);
        assert!(corner[2] > corner[0]);
    }
}
