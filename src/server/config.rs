use axum::http::HeaderName;
use clap::Parser;
use uuid::Uuid;

use crate::logo::FetchLimits;
use crate::request::DEFAULT_MAX_SIZE;

/// Server configuration loaded from command-line flags or environment
/// variables.
///
/// | Env Var                   | Default                 |
/// |---------------------------|-------------------------|
/// | `HOST`                    | `0.0.0.0`               |
/// | `PORT`                    | `8000`                  |
/// | `PUBLIC_BASE_URL`         | `http://127.0.0.1:8000` |
/// | `GATE_HEADER`             | `x-rapidapi-host`       |
/// | `LOGO_FETCH_TIMEOUT_SECS` | `5`                     |
/// | `LOGO_MAX_BYTES`          | `5242880`               |
/// | `MAX_SIZE`                | `4096`                  |
/// | `RENDER_CACHE_CAPACITY`   | `128`                   |
/// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
#[derive(Debug, Clone, Parser)]
#[command(name = "qrstyle", version, about = "Styled QR code rendering service")]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Externally reachable base URL, embedded in dynamic symbols.
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub public_base_url: String,

    /// Header every gated request must carry. Empty or `off` disables the gate.
    #[arg(long, env = "GATE_HEADER", default_value = "x-rapidapi-host")]
    pub gate_header: String,

    /// Timeout for fetching a remote logo, in seconds.
    #[arg(long, env = "LOGO_FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub logo_fetch_timeout_secs: u64,

    /// Largest accepted logo, in bytes.
    #[arg(long, env = "LOGO_MAX_BYTES", default_value_t = 5 * 1024 * 1024)]
    pub logo_max_bytes: usize,

    /// Largest accepted output edge length, in pixels.
    #[arg(long, env = "MAX_SIZE", default_value_t = DEFAULT_MAX_SIZE)]
    pub max_size: u32,

    /// Number of encoded renders kept in memory. Zero disables the cache.
    #[arg(long, env = "RENDER_CACHE_CAPACITY", default_value_t = 128)]
    pub render_cache_capacity: usize,

    /// Total size of the encoded renders kept in memory, in bytes.
    #[arg(long, env = "RENDER_CACHE_MAX_BYTES", default_value_t = 64 * 1024 * 1024)]
    pub render_cache_max_bytes: usize,

    /// HTTP request timeout, in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            public_base_url: "http://127.0.0.1:8000".to_string(),
            gate_header: "x-rapidapi-host".to_string(),
            logo_fetch_timeout_secs: 5,
            logo_max_bytes: 5 * 1024 * 1024,
            max_size: DEFAULT_MAX_SIZE,
            render_cache_capacity: 128,
            render_cache_max_bytes: 64 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// The gate header, or `None` when the gate is disabled.
    ///
    /// An unparsable name also disables the gate; [`ServerConfig::validate`]
    /// reports it at startup.
    pub fn gate_header_name(&self) -> Option<HeaderName> {
        let name = self.gate_header.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("off") {
            return None;
        }
        HeaderName::try_from(name.to_ascii_lowercase()).ok()
    }

    /// URL a dynamic symbol encodes for link `id`.
    pub fn resolver_url(&self, id: Uuid) -> String {
        format!("{}/redirect/{id}", self.public_base_url.trim_end_matches('/'))
    }

    pub fn fetch_limits(&self) -> FetchLimits {
        FetchLimits {
            timeout: std::time::Duration::from_secs(self.logo_fetch_timeout_secs),
            max_bytes: self.logo_max_bytes,
        }
    }

    /// Checks values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.gate_header.trim();
        if !name.is_empty()
            && !name.eq_ignore_ascii_case("off")
            && HeaderName::try_from(name.to_ascii_lowercase()).is_err()
        {
            return Err(format!("GATE_HEADER `{name}` is not a valid header name"));
        }
        if self.max_size == 0 {
            return Err("MAX_SIZE must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flags() {
        let parsed = ServerConfig::parse_from(["qrstyle"]);
        let default = ServerConfig::default();
        // Environment variables may override a parsed value, so only
        // compare fields tests never set.
        assert_eq!(parsed.logo_max_bytes, default.logo_max_bytes);
        assert_eq!(parsed.render_cache_capacity, default.render_cache_capacity);
        assert_eq!(parsed.render_cache_max_bytes, default.render_cache_max_bytes);
    }

    #[test]
    fn gate_can_be_disabled() {
        let mut config = ServerConfig::default();
        assert_eq!(
            config.gate_header_name(),
            Some(HeaderName::from_static("x-rapidapi-host"))
        );
        config.gate_header = String::new();
        assert_eq!(config.gate_header_name(), None);
        config.gate_header = "OFF".to_string();
        assert_eq!(config.gate_header_name(), None);
    }

    #[test]
    fn resolver_url_trims_trailing_slash() {
        let config = ServerConfig {
            public_base_url: "https://qr.example/".to_string(),
            ..ServerConfig::default()
        };
        let id = Uuid::nil();
        assert_eq!(
            config.resolver_url(id),
            "https://qr.example/redirect/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn invalid_gate_header_fails_validation() {
        let config = ServerConfig {
            gate_header: "bad header".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ServerConfig::default().validate().is_ok());
    }
}
