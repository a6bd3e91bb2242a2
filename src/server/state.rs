use std::sync::Arc;

use crate::cache::RenderCache;
use crate::links::LinkStore;

use super::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Dynamic link records. Lost on restart.
    pub links: Arc<LinkStore>,
    /// Encoded renders keyed by normalized request.
    pub cache: Arc<RenderCache>,
    /// Client used for remote logo fetches.
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates fresh state with an empty link store and cache.
    pub fn new(config: ServerConfig) -> Self {
        let cache = RenderCache::new(config.render_cache_capacity)
            .with_max_bytes(config.render_cache_max_bytes);
        Self {
            config: Arc::new(config),
            links: Arc::new(LinkStore::new()),
            cache: Arc::new(cache),
            http: reqwest::Client::new(),
        }
    }
}
