//! Post-rasterization layers.
//!
//! After the symbol is rasterized and resized, a request may stack up to
//! three layers on top of it. Each layer config implements [`LayerEffect`]
//! and transforms the [`RenderContext`] in place. Layers are built per
//! request from immutable inputs and never shared between requests.

pub mod caption;
pub mod logo;
pub mod svg;
pub mod transparency;

pub use caption::CaptionConfig;
pub use logo::LogoOverlayConfig;
pub use transparency::{DEFAULT_LUMINANCE_THRESHOLD, TransparencyConfig};

use crate::canvas::Canvas;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the layer pipeline.
pub struct RenderContext {
    /// The canvas being processed through the pipeline.
    pub canvas: Canvas,
}

impl RenderContext {
    /// Creates a new render context around the given canvas.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// Trait for layer configurations that know how to apply themselves.
pub trait LayerEffect {
    /// Short name used in trace output.
    fn name(&self) -> &'static str;

    /// Transform the canvas in the render context.
    fn transform(&self, ctx: &mut RenderContext);
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The ordered set of optional layers for one render.
///
/// ```text
/// Resized symbol
///     │
///     ▼
/// ┌──────────────┐
/// │     Logo     │ ◄── centered on the symbol bounds
/// └──────┬───────┘
///        ▼
/// ┌──────────────┐
/// │   Caption    │ ◄── extends the canvas downwards
/// └──────┬───────┘
///        ▼
/// ┌──────────────┐
/// │ Transparency │ ◄── strips light pixels, applied last
/// └──────────────┘
/// ```
#[derive(Debug, Default)]
pub struct LayerPipeline {
    pub logo: Option<LogoOverlayConfig>,
    pub caption: Option<CaptionConfig>,
    pub transparency: Option<TransparencyConfig>,
}

impl LayerPipeline {
    /// Returns true if no layer is configured.
    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.caption.is_none() && self.transparency.is_none()
    }

    /// Applies every configured layer in order and returns the result.
    pub fn render(&self, canvas: Canvas) -> Canvas {
        let mut ctx = RenderContext::new(canvas);
        apply(self.logo.as_ref(), &mut ctx);
        apply(self.caption.as_ref(), &mut ctx);
        apply(self.transparency.as_ref(), &mut ctx);
        ctx.canvas
    }
}

fn apply<L: LayerEffect>(layer: Option<&L>, ctx: &mut RenderContext) {
    if let Some(layer) = layer {
        tracing::trace!(layer = layer.name(), "applying layer");
        layer.transform(ctx);
    }
}
