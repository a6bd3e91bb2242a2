//! Logo sources: uploaded bytes or a remote URL.
//!
//! A logo is optional decoration. Every failure here is reported as a
//! [`LogoError`] and the caller decides whether to degrade; the compositor
//! always does.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

use image::RgbaImage;

// ============================================================================
// Errors
// ============================================================================

/// Why a logo could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    /// The HTTP request failed before a response arrived.
    #[error("logo request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote server answered with a non-success status.
    #[error("logo request returned status {0}")]
    Status(u16),

    /// The body exceeded the configured byte limit.
    #[error("logo exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// The fetch did not finish in time.
    #[error("logo request timed out after {0:?}")]
    Timeout(Duration),

    /// The bytes are not a decodable raster image.
    #[error("logo could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    /// The blocking decode task was cancelled or panicked.
    #[error("logo decode task failed: {0}")]
    Task(String),
}

// ============================================================================
// Logo
// ============================================================================

/// A decoded logo image plus a fingerprint of its source bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    image: RgbaImage,
    fingerprint: u64,
}

impl Logo {
    /// Decodes any raster format the `image` crate understands.
    pub fn decode(bytes: &[u8]) -> Result<Self, LogoError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            image,
            fingerprint: fingerprint(bytes),
        })
    }

    /// Wraps an already decoded image.
    pub fn from_image(image: RgbaImage) -> Self {
        let fingerprint = fingerprint(image.as_raw());
        Self { image, fingerprint }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Stable identity of the logo content, used in render cache keys.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Sources
// ============================================================================

/// Where a request's logo comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogoSource {
    /// Bytes uploaded with the request.
    Upload(Vec<u8>),
    /// A URL to fetch the image from.
    Url(String),
}

/// Bounds applied to remote logo fetches.
#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Turns a [`LogoSource`] into a decoded [`Logo`], fetching remote URLs with
/// the shared client. Decoding runs on the blocking pool.
pub async fn resolve_logo(
    client: &reqwest::Client,
    source: &LogoSource,
    limits: FetchLimits,
) -> Result<Logo, LogoError> {
    match source {
        LogoSource::Upload(bytes) => {
            if bytes.len() > limits.max_bytes {
                return Err(LogoError::TooLarge {
                    limit: limits.max_bytes,
                });
            }
            decode_blocking(bytes.clone()).await
        }
        LogoSource::Url(url) => {
            let bytes = fetch(client, url, limits).await?;
            decode_blocking(bytes).await
        }
    }
}

async fn decode_blocking(bytes: Vec<u8>) -> Result<Logo, LogoError> {
    tokio::task::spawn_blocking(move || Logo::decode(&bytes))
        .await
        .unwrap_or_else(|e| Err(LogoError::Task(e.to_string())))
}

/// Downloads `url`, enforcing both the timeout and the size limit.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    limits: FetchLimits,
) -> Result<Vec<u8>, LogoError> {
    let download = async {
        let mut response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LogoError::Status(status.as_u16()));
        }

        let too_large = LogoError::TooLarge {
            limit: limits.max_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > limits.max_bytes as u64)
        {
            return Err(too_large);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limits.max_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    };

    tokio::time::timeout(limits.timeout, download)
        .await
        .map_err(|_| LogoError::Timeout(limits.timeout))?
}
