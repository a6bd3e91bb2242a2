//! Bounded cache of encoded renders.
//!
//! Rendering is deterministic, so identical normalized requests can share
//! one encoded output. Entries are evicted first-in, first-out once either
//! the entry count or the total encoded size exceeds its limit.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::encode::{EncodedImage, OutputFormat};
use crate::logo::Logo;
use crate::request::RenderRequest;
use crate::style::StyleSpec;

// ============================================================================
// CacheKey
// ============================================================================

/// Identity of a render: every input that can change the output bytes.
///
/// The logo is represented by its content fingerprint, not by its source,
/// so the same image uploaded twice hits the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    payload: String,
    style: StyleSpec,
    size: u32,
    format: OutputFormat,
    caption: Option<String>,
    transparent: bool,
    logo: Option<u64>,
}

impl CacheKey {
    /// Creates a key for `request` rendered with the given (already loaded)
    /// logo.
    pub fn new(request: &RenderRequest, logo: Option<&Logo>) -> Self {
        Self {
            payload: request.payload.clone(),
            style: request.style,
            size: request.size,
            format: request.format.clone(),
            caption: request.caption.clone(),
            transparent: request.transparent,
            logo: logo.map(Logo::fingerprint),
        }
    }
}

// ============================================================================
// RenderCache
// ============================================================================

/// Thread-safe FIFO cache. A capacity of zero disables caching.
#[derive(Debug)]
pub struct RenderCache {
    capacity: usize,
    max_bytes: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<CacheKey, EncodedImage>,
    order: VecDeque<CacheKey>,
    bytes: usize,
}

impl RenderCache {
    /// Creates a cache holding up to `capacity` entries of any total size.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            max_bytes: usize::MAX,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Also bounds the summed length of the stored outputs. A single output
    /// larger than `max_bytes` is never stored.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Summed length of the stored outputs.
    pub fn total_bytes(&self) -> usize {
        self.lock().bytes
    }

    /// Returns a copy of the cached output for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<EncodedImage> {
        if self.capacity == 0 {
            return None;
        }
        self.lock().entries.get(key).cloned()
    }

    /// Stores `value`, evicting the oldest entries beyond either limit.
    pub fn insert(&self, key: CacheKey, value: EncodedImage) {
        let size = value.len();
        if self.capacity == 0 || size > self.max_bytes {
            return;
        }
        let mut inner = self.lock();
        inner.bytes += size;
        match inner.entries.insert(key.clone(), value) {
            Some(previous) => inner.bytes -= previous.len(),
            None => inner.order.push_back(key),
        }
        while inner.order.len() > self.capacity || inner.bytes > self.max_bytes {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            if let Some(evicted) = inner.entries.remove(&oldest) {
                inner.bytes -= evicted.len();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
        inner.bytes = 0;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RenderParams;
    use image::{Rgba, RgbaImage};

    fn key(data: &str) -> CacheKey {
        let request = RenderParams::new(data).into_request(4096).unwrap();
        CacheKey::new(&request, None)
    }

    fn value(n: u8) -> EncodedImage {
        EncodedImage::Binary {
            bytes: vec![n],
            content_type: "image/png".into(),
        }
    }

    #[test]
    fn stores_and_returns_entries() {
        let cache = RenderCache::new(4);
        cache.insert(key("a"), value(1));
        assert_eq!(cache.get(&key("a")), Some(value(1)));
        assert_eq!(cache.get(&key("b")), None);
    }

    #[test]
    fn evicts_oldest_first() {
        let cache = RenderCache::new(2);
        cache.insert(key("a"), value(1));
        cache.insert(key("b"), value(2));
        cache.insert(key("c"), value(3));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a")), None);
        assert_eq!(cache.get(&key("c")), Some(value(3)));
    }

    #[test]
    fn overwriting_does_not_grow_the_queue() {
        let cache = RenderCache::new(2);
        cache.insert(key("a"), value(1));
        cache.insert(key("a"), value(9));
        cache.insert(key("b"), value(2));

        assert_eq!(cache.get(&key("a")), Some(value(9)));
        assert_eq!(cache.get(&key("b")), Some(value(2)));
    }

    fn sized(len: usize) -> EncodedImage {
        EncodedImage::Binary {
            bytes: vec![0; len],
            content_type: "image/png".into(),
        }
    }

    #[test]
    fn evicts_oldest_when_byte_budget_is_exceeded() {
        let cache = RenderCache::new(10).with_max_bytes(100);
        cache.insert(key("a"), sized(40));
        cache.insert(key("b"), sized(40));
        assert_eq!(cache.total_bytes(), 80);

        cache.insert(key("c"), sized(40));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.total_bytes(), 80);
        assert_eq!(cache.get(&key("a")), None);
        assert!(cache.get(&key("c")).is_some());
    }

    #[test]
    fn oversized_output_is_not_stored() {
        let cache = RenderCache::new(10).with_max_bytes(100);
        cache.insert(key("a"), sized(40));
        cache.insert(key("big"), sized(101));

        assert_eq!(cache.get(&key("big")), None);
        assert!(cache.get(&key("a")).is_some());
    }

    #[test]
    fn overwriting_updates_byte_total() {
        let cache = RenderCache::new(10).with_max_bytes(100);
        cache.insert(key("a"), sized(60));
        cache.insert(key("a"), sized(20));
        assert_eq!(cache.total_bytes(), 20);

        cache.clear();
        assert_eq!(cache.total_bytes(), 0);
    }

    #[test]
    fn zero_capacity_disables() {
        let cache = RenderCache::new(0);
        cache.insert(key("a"), value(1));
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn logo_content_is_part_of_the_key() {
        let request = RenderParams::new("x").into_request(4096).unwrap();
        let red = Logo::from_image(RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255])));
        let blue = Logo::from_image(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255])));

        assert_ne!(CacheKey::new(&request, Some(&red)), CacheKey::new(&request, Some(&blue)));
        assert_ne!(CacheKey::new(&request, Some(&red)), CacheKey::new(&request, None));
        assert_eq!(CacheKey::new(&request, Some(&red)), CacheKey::new(&request, Some(&red.clone())));
    }
}
