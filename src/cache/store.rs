// Cache store for weather responses.
// Wraps the key-value store with timestamped JSON entries and TTL-filtered reads.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{NimbusError, Result};
use crate::storage::SharedStore;

use super::key::CacheKey;

/// Default TTL for weather responses: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Wrapper for cached data with its write timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Age of the entry relative to `now`. Future timestamps count as infinitely old.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX)
    }

    /// Fresh iff `now - cached_at < ttl`.
    pub fn is_fresh_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now) < ttl
    }

    /// Check if this cached data is still fresh.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(ttl, Utc::now())
    }
}

/// Read-through/write-through cache over a shared key-value store.
///
/// Expired entries are never deleted. They stay readable through
/// [`CacheStore::get_stale`] so fallback paths can still show something.
#[derive(Clone)]
pub struct CacheStore {
    store: SharedStore,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(store: SharedStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Write `value` stamped with the current time, replacing any prior entry.
    pub fn put<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<()> {
        self.put_entry(key, &CachedData::new(value))
    }

    /// Write a pre-stamped entry.
    pub fn put_entry<T: Serialize>(&self, key: &CacheKey, entry: &CachedData<T>) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        self.store.set(key.as_str(), &json)
    }

    /// Return the value only if present, well-formed, and fresh.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.load::<T>(key)?;
        if entry.is_fresh(self.ttl) {
            tracing::debug!(%key, "cache hit");
            Some(entry.data)
        } else {
            tracing::debug!(%key, "cache entry expired");
            None
        }
    }

    /// Return the value regardless of age. Used only by fallback paths.
    pub fn get_stale<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<CachedData<T>> {
        self.load(key)
    }

    /// Load and decode an entry, collapsing storage and decode failures to absent.
    fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<CachedData<T>> {
        match self.read_entry(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(%key, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<CachedData<T>>> {
        let Some(raw) = self.store.get(key.as_str())? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|_| NimbusError::MalformedCache {
                key: key.to_string(),
            })
    }
}
