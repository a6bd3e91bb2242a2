//! qrstyle: styled QR code rendering with time-bounded dynamic links
//!
//! This crate turns text into QR symbols drawn with configurable module
//! shapes, color gradients, logos and captions, and encodes the result as
//! PNG, WebP, PDF, SVG or base64. A small in-memory link store lets a
//! printed symbol point at a destination that can change later.
//!
//! # Example
//!
//! ```
//! use qrstyle::{EncodedImage, RenderParams, render};
//!
//! let request = RenderParams::new("https://example.org")
//!     .with_module_style("rounded")
//!     .with_gradient("radial")
//!     .with_colors("#1E3A8A", "#38BDF8")
//!     .with_size(300)
//!     .into_request(4096)
//!     .unwrap();
//!
//! let encoded = render(&request, None).unwrap();
//! assert!(matches!(encoded, EncodedImage::Binary { .. }));
//! ```
//!
//! # Dynamic links
//!
//! ```
//! use qrstyle::{LinkError, LinkStore};
//!
//! let store = LinkStore::new();
//! let record = store.create("https://example.org/spring", 7);
//! let id = record.id.to_string();
//!
//! assert_eq!(store.resolve(&id).unwrap(), "https://example.org/spring");
//! store.update(&id, "https://example.org/summer", 30).unwrap();
//! assert_eq!(store.resolve("unknown"), Err(LinkError::NotFound));
//! ```
//!
//! The HTTP service lives in [`server`]; the `qrstyle` binary runs it.

pub mod cache;
pub mod canvas;
pub mod color;
pub mod compositor;
pub mod encode;
pub mod error;
pub mod layer;
pub mod links;
pub mod logo;
pub mod raster;
pub mod render;
pub mod request;
pub mod server;
pub mod style;
pub mod symbol;

pub use cache::{CacheKey, RenderCache};
pub use canvas::{Canvas, RectPx};
pub use color::{ColorSpec, parse_color};
pub use compositor::composite;
pub use encode::{EncodedImage, OutputFormat, encode};
pub use error::{RenderError, RenderResult};
pub use layer::{CaptionConfig, LayerEffect, LayerPipeline, LogoOverlayConfig, TransparencyConfig};
pub use links::{LinkError, LinkRecord, LinkStore};
pub use logo::{FetchLimits, Logo, LogoError, LogoSource, resolve_logo};
pub use render::render;
pub use request::{RenderParams, RenderRequest};
pub use style::{GradientKind, ModuleShape, StyleSpec, resolve};
pub use symbol::SymbolMatrix;
