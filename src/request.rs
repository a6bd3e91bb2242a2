//! Render parameters as they arrive on the wire, and the validated request
//! built from them.
//!
//! [`RenderParams`] keeps every field optional and stringly typed so it can
//! be filled from a query string, a form or JSON. [`RenderParams::into_request`]
//! applies defaults, resolves the style and checks the size.
//!
//! # Example
//!
//! ```
//! use qrstyle::{OutputFormat, RenderParams};
//!
//! let params = RenderParams::new("https://example.org")
//!     .with_module_style("circle")
//!     .with_colors("#FF0000", "#0000FF")
//!     .with_size(400);
//!
//! let json = params.to_json().unwrap();
//! let request = RenderParams::from_json(&json).unwrap().into_request(4096).unwrap();
//! assert_eq!(request.size, 400);
//! assert_eq!(request.format, OutputFormat::Png);
//! ```

use serde::{Deserialize, Serialize};

use crate::encode::OutputFormat;
use crate::error::{RenderError, RenderResult};
use crate::logo::LogoSource;
use crate::style::{StyleSpec, resolve};

/// Edge length used when a request does not name one.
pub const DEFAULT_SIZE: u32 = 600;

/// Largest accepted edge length unless configured otherwise.
pub const DEFAULT_MAX_SIZE: u32 = 4096;

// ============================================================================
// RenderParams
// ============================================================================

/// Unvalidated render parameters.
///
/// Foreground color is `start_color`, falling back to `body_color`; the
/// background is `end_color`, falling back to `bg_color`. A transparent
/// render always uses a white background and is delivered as WebP unless
/// PNG or WebP was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    pub data: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    pub as_base64: bool,

    pub transparent: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// Uploaded logo bytes. Never serialized.
    #[serde(skip)]
    pub logo_upload: Option<Vec<u8>>,
}

impl RenderParams {
    /// Creates parameters for `data` with everything else defaulted.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn with_module_style(mut self, name: impl Into<String>) -> Self {
        self.module_style = Some(name.into());
        self
    }

    pub fn with_gradient(mut self, name: impl Into<String>) -> Self {
        self.gradient_type = Some(name.into());
        self
    }

    /// Sets the start and end colors.
    pub fn with_colors(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_color = Some(start.into());
        self.end_color = Some(end.into());
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Serializes to JSON. Uploaded logo bytes are left out.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Applies defaults and validates.
    ///
    /// Fails if `data` is missing or empty, or if the size is outside
    /// `1..=max_size`.
    pub fn into_request(self, max_size: u32) -> RenderResult<RenderRequest> {
        let payload = self
            .data
            .filter(|data| !data.is_empty())
            .ok_or(RenderError::MissingField("data"))?;

        let size = self.size.unwrap_or(DEFAULT_SIZE);
        if size == 0 || size > max_size {
            return Err(RenderError::InvalidSize {
                size,
                max: max_size,
            });
        }

        let file = self.file.as_deref().unwrap_or("png");
        let mut format = OutputFormat::select(file, self.as_base64);
        if self.transparent
            && !matches!(format, OutputFormat::Png | OutputFormat::Webp | OutputFormat::Base64Png)
        {
            format = OutputFormat::Webp;
        }

        let front = self
            .start_color
            .or(self.body_color)
            .unwrap_or_else(|| "#000000".to_string());
        let back = if self.transparent {
            "#FFFFFF".to_string()
        } else {
            self.end_color
                .or(self.bg_color)
                .unwrap_or_else(|| "#FFFFFF".to_string())
        };
        let style = resolve(
            self.module_style.as_deref().unwrap_or("square"),
            self.gradient_type.as_deref().unwrap_or("solid"),
            &front,
            &back,
        );

        let logo = match (self.logo_upload, self.logo_url) {
            (Some(bytes), _) if !bytes.is_empty() => Some(LogoSource::Upload(bytes)),
            (_, Some(url)) if !url.trim().is_empty() => Some(LogoSource::Url(url.trim().to_string())),
            _ => None,
        };

        Ok(RenderRequest {
            payload,
            style,
            size,
            format,
            logo,
            caption: self.caption.filter(|caption| !caption.is_empty()),
            transparent: self.transparent,
        })
    }
}

// ============================================================================
// RenderRequest
// ============================================================================

/// A validated render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Text encoded into the symbol.
    pub payload: String,
    pub style: StyleSpec,
    /// Output edge length in pixels, before any caption strip.
    pub size: u32,
    pub format: OutputFormat,
    pub logo: Option<LogoSource>,
    pub caption: Option<String>,
    /// Strip light pixels after composition.
    pub transparent: bool,
}
