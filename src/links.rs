//! Dynamic link store.
//!
//! A dynamic barcode encodes a resolver URL containing a link id. The store
//! maps that id to the current target and an expiry instant, so the printed
//! image can keep working while its destination changes.
//!
//! Records live in memory only and are never deleted. An expired record is
//! reported as [`LinkError::Expired`] until an update extends it again.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Types
// ============================================================================

/// One redirect record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub id: Uuid,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Expiry has whole-second resolution: a link stays active until a full
    /// second has passed since `expires_at`. A zero-day link therefore
    /// resolves for the requests that immediately follow its creation.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        (now - self.expires_at).num_seconds() < 1
    }
}

/// Why a link lookup did not produce a target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("QR code not found")]
    NotFound,

    #[error("QR code expired")]
    Expired,
}

// ============================================================================
// LinkStore
// ============================================================================

/// Thread-safe registry of dynamic links.
///
/// Every operation takes the lock once, so an update's read-modify-write is
/// atomic with respect to concurrent resolves and updates.
#[derive(Debug, Default)]
pub struct LinkStore {
    records: RwLock<HashMap<Uuid, LinkRecord>>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `target_url` under a fresh id, expiring `ttl_days` from now.
    pub fn create(&self, target_url: impl Into<String>, ttl_days: i64) -> LinkRecord {
        self.create_at(target_url, ttl_days, Utc::now())
    }

    pub fn create_at(&self, target_url: impl Into<String>, ttl_days: i64, now: DateTime<Utc>) -> LinkRecord {
        let record = LinkRecord {
            id: Uuid::new_v4(),
            target_url: target_url.into(),
            created_at: now,
            expires_at: now + days(ttl_days),
        };
        self.write().insert(record.id, record.clone());
        tracing::info!(
            id = %record.id,
            target = %record.target_url,
            expires_at = %record.expires_at,
            "created dynamic link"
        );
        record
    }

    /// Returns the current target of an active link.
    pub fn resolve(&self, id: &str) -> Result<String, LinkError> {
        self.resolve_at(id, Utc::now())
    }

    pub fn resolve_at(&self, id: &str, now: DateTime<Utc>) -> Result<String, LinkError> {
        let id = parse_id(id)?;
        let records = self.read();
        let record = records.get(&id).ok_or(LinkError::NotFound)?;
        if record.is_active_at(now) {
            Ok(record.target_url.clone())
        } else {
            Err(LinkError::Expired)
        }
    }

    /// Replaces the target of a link and, when `extend_days > 0`, pushes its
    /// expiry out by that many days from the current expiry.
    ///
    /// Works on expired links too; a large enough extension makes them
    /// active again.
    pub fn update(&self, id: &str, new_target: impl Into<String>, extend_days: i64) -> Result<LinkRecord, LinkError> {
        let id = parse_id(id)?;
        let mut records = self.write();
        let record = records.get_mut(&id).ok_or(LinkError::NotFound)?;
        record.target_url = new_target.into();
        if extend_days > 0 {
            record.expires_at += days(extend_days);
        }
        tracing::info!(
            id = %record.id,
            target = %record.target_url,
            expires_at = %record.expires_at,
            "updated dynamic link"
        );
        Ok(record.clone())
    }

    /// Returns a copy of the record, active or not.
    pub fn get(&self, id: &str) -> Option<LinkRecord> {
        let id = parse_id(id).ok()?;
        self.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, LinkRecord>> {
        // A panic while holding the lock cannot leave a record half-written,
        // so a poisoned map is still consistent.
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, LinkRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_id(id: &str) -> Result<Uuid, LinkError> {
    Uuid::parse_str(id.trim()).map_err(|_| LinkError::NotFound)
}

/// Clamps absurd day counts instead of overflowing the timestamp.
fn days(n: i64) -> Duration {
    Duration::try_days(n.clamp(-36_500, 36_500)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn created_link_resolves_until_expiry() {
        let store = LinkStore::new();
        let record = store.create_at("https://a.example", 7, t0());
        let id = record.id.to_string();

        assert_eq!(record.expires_at, t0() + Duration::days(7));
        assert_eq!(store.resolve_at(&id, t0()).unwrap(), "https://a.example");
        assert_eq!(
            store.resolve_at(&id, t0() + Duration::days(7)).unwrap(),
            "https://a.example"
        );
        assert_matches!(
            store.resolve_at(&id, t0() + Duration::days(7) + Duration::seconds(1)),
            Err(LinkError::Expired)
        );
    }

    #[test]
    fn zero_day_ttl_is_active_at_creation() {
        let store = LinkStore::new();
        let record = store.create_at("https://a.example", 0, t0());
        let id = record.id.to_string();

        assert!(store.resolve_at(&id, t0()).is_ok());
        assert!(store.resolve_at(&id, t0() + Duration::milliseconds(999)).is_ok());
        assert_matches!(
            store.resolve_at(&id, t0() + Duration::seconds(1)),
            Err(LinkError::Expired)
        );
    }

    #[test]
    fn expiry_resolution_does_not_depend_on_subsecond_offset() {
        let store = LinkStore::new();
        let created = t0() + Duration::milliseconds(750);
        let record = store.create_at("https://a.example", 0, created);

        assert!(record.is_active_at(created + Duration::milliseconds(900)));
        assert!(!record.is_active_at(created + Duration::milliseconds(1000)));
    }

    #[test]
    fn unknown_and_malformed_ids_are_not_found() {
        let store = LinkStore::new();
        assert_matches!(
            store.resolve(&Uuid::new_v4().to_string()),
            Err(LinkError::NotFound)
        );
        assert_matches!(store.resolve("not-a-uuid"), Err(LinkError::NotFound));
        assert_matches!(store.update("nope", "x", 1), Err(LinkError::NotFound));
    }

    #[test]
    fn update_replaces_target_and_extends_from_existing_expiry() {
        let store = LinkStore::new();
        let record = store.create_at("https://a.example", 7, t0());
        let id = record.id.to_string();

        let updated = store.update(&id, "https://b.example", 3).unwrap();
        assert_eq!(updated.target_url, "https://b.example");
        assert_eq!(updated.expires_at, t0() + Duration::days(10));
        assert_eq!(updated.created_at, t0());

        let again = store.update(&id, "https://c.example", 0).unwrap();
        assert_eq!(again.expires_at, t0() + Duration::days(10));
        assert_eq!(store.resolve_at(&id, t0()).unwrap(), "https://c.example");
    }

    #[test]
    fn negative_extension_is_ignored() {
        let store = LinkStore::new();
        let id = store.create_at("https://a.example", 7, t0()).id.to_string();
        let updated = store.update(&id, "https://a.example", -3).unwrap();
        assert_eq!(updated.expires_at, t0() + Duration::days(7));
    }

    #[test]
    fn extension_can_resurrect_an_expired_link() {
        let store = LinkStore::new();
        let id = store.create_at("https://a.example", 0, t0()).id.to_string();
        let later = t0() + Duration::days(2);

        assert_matches!(store.resolve_at(&id, later), Err(LinkError::Expired));
        store.update(&id, "https://b.example", 5).unwrap();
        assert_eq!(store.resolve_at(&id, later).unwrap(), "https://b.example");
    }

    #[test]
    fn ids_are_unique_v4() {
        let store = LinkStore::new();
        let a = store.create("x", 1);
        let b = store.create("x", 1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.get_version_num(), 4);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_extensions_are_not_lost() {
        let store = Arc::new(LinkStore::new());
        let id = store.create_at("https://a.example", 0, t0()).id.to_string();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let id = id.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.update(&id, format!("https://{i}.example"), 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let record = store.get(&id).unwrap();
        assert_eq!(record.expires_at, t0() + Duration::days(200));
    }
}
