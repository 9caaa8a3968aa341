//! Known-OCID cache used when registering searched characters.
//!
//! The cache is owned by the caller (application state) and handed to the store per call, so its
//! TTL is injectable and tests can hold their own instance.

use std::{collections::HashSet, time::Duration};

use tokio::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};

pub const DEFAULT_OCID_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

struct CachedOcids {
    loaded_at: Instant,
    ocids: HashSet<String>,
}

/// Set of OCIDs known to be in the identifier list, refreshed after `ttl`.
pub struct OcidCache {
    ttl: Duration,
    state: Mutex<Option<CachedOcids>>,
}

/// Exclusive access to the cache for a check-then-append sequence.
pub struct OcidCacheEntry<'a> {
    ttl: Duration,
    guard: MutexGuard<'a, Option<CachedOcids>>,
}

impl OcidCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(None),
        }
    }

    /// Locks the cache until the returned entry is dropped.
    pub async fn entry(&self) -> OcidCacheEntry<'_> {
        OcidCacheEntry {
            ttl: self.ttl,
            guard: self.state.lock().await,
        }
    }

    /// Forces the next [`OcidCache::entry`] to report a stale cache.
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }
}

impl Default for OcidCache {
    fn default() -> Self {
        Self::new(DEFAULT_OCID_CACHE_TTL)
    }
}

impl OcidCacheEntry<'_> {
    /// Loaded and younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        self.guard
            .as_ref()
            .is_some_and(|cached| cached.loaded_at.elapsed() < self.ttl)
    }

    pub fn contains(&self, ocid: &str) -> bool {
        self.guard
            .as_ref()
            .is_some_and(|cached| cached.ocids.contains(ocid))
    }

    /// Replaces the cached set and restarts the TTL.
    pub fn replace(&mut self, ocids: HashSet<String>) {
        *self.guard = Some(CachedOcids {
            loaded_at: Instant::now(),
            ocids,
        });
    }

    /// Adds an OCID without touching the TTL; no-op on an unloaded cache.
    pub fn insert(&mut self, ocid: String) {
        if let Some(cached) = self.guard.as_mut() {
            cached.ocids.insert(ocid);
        }
    }
}
