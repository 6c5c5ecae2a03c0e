//! In-memory response cache with per-entry expiry and background eviction.
//!
//! Stores cloneable values under string keys, each tagged with an absolute
//! expiry at write time. Expired entries are evicted lazily on lookup and by
//! a periodic sweep task owned by the cache itself; dropping the cache stops
//! the sweep and drops all entries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::debug;

/// How often the background sweep removes expired entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe key-value cache with per-entry TTL.
///
/// Safe for concurrent `get`/`set` from overlapping search calls; the map is
/// the only structure mutated concurrently, behind a single `RwLock`.
pub struct ResponseCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    sweeper: JoinHandle<()>,
}

impl<V: Clone + Send + Sync + 'static> ResponseCache<V> {
    /// Create a cache and start its sweep task. Requires a tokio runtime.
    pub fn new() -> Self {
        Self::with_sweep_interval(SWEEP_INTERVAL)
    }

    /// Create a cache with a custom sweep interval (shorter in tests).
    pub fn with_sweep_interval(interval: Duration) -> Self {
        let entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>> =
            Arc::new(RwLock::new(HashMap::new()));

        let sweep_entries = Arc::clone(&entries);
        let sweeper = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh cache is
            // not swept before anything is stored.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Ok(mut map) = sweep_entries.write() else {
                    return;
                };
                let before = map.len();
                map.retain(|_, entry| !entry.is_expired());
                let evicted = before - map.len();
                if evicted > 0 {
                    debug!(evicted, remaining = map.len(), "cache sweep evicted expired entries");
                }
            }
        });

        Self { entries, sweeper }
    }

    /// Look up a value. Expired entries are evicted and treated as absent.
    /// A poisoned lock degrades to a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        if key.trim().is_empty() {
            return None;
        }

        {
            let map = self.entries.read().ok()?;
            match map.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Entry exists but has expired; evict it under the write lock.
        if let Ok(mut map) = self.entries.write() {
            if map.get(key).is_some_and(CacheEntry::is_expired) {
                map.remove(key);
            }
        }
        None
    }

    /// Store a value with expiry `now + ttl`. Write failures are dropped.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        if key.trim().is_empty() {
            return;
        }

        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        if let Ok(mut map) = self.entries.write() {
            map.insert(key.to_string(), entry);
        }
    }

    /// Number of live (possibly expired but not yet evicted) entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Drop for ResponseCache<V> {
    fn drop(&mut self) {
        self.sweeper.abort();
        if let Ok(mut map) = self.entries.write() {
            map.clear();
        }
    }
}
