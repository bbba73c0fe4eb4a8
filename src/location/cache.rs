//! In-memory verdict cache.
//!
//! LRU, fixed capacity, no TTL. Keys are the raw (city, country) pair, so
//! "Paris"/"france" and "Paris"/"France" are separate entries.
//! Failed lookups are never stored.

use super::types::{LocationQuery, Verdict};
use lru::LruCache;
use std::num::NonZeroUsize;

pub const DEFAULT_CAPACITY: usize = 256;

/// The verdict cache.
pub struct VerdictCache {
    entries: LruCache<LocationQuery, Verdict>,
}

impl VerdictCache {
    /// Create a cache holding at most `capacity` verdicts (0 is treated as 1).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
        }
    }

    /// Look up a verdict, marking it most recently used.
    pub fn get(&mut self, city: &str, country: &str) -> Option<Verdict> {
        self.entries.get(&LocationQuery::new(city, country)).copied()
    }

    /// Store a verdict, evicting the least recently used entry when full.
    pub fn put(&mut self, city: &str, country: &str, verdict: Verdict) {
        let key = LocationQuery::new(city, country);
        if let Some((evicted, _)) = self.entries.push(key.clone(), verdict) {
            if evicted != key {
                tracing::debug!(evicted = %evicted, "verdict cache eviction");
            }
        }
    }

    /// Return the cached verdict, or run `compute` and cache its result.
    ///
    /// An `Err` from `compute` is returned as-is and leaves the cache untouched.
    pub fn get_or_compute<E, F>(&mut self, city: &str, country: &str, compute: F) -> Result<Verdict, E>
    where
        F: FnOnce() -> Result<Verdict, E>,
    {
        if let Some(verdict) = self.get(city, country) {
            tracing::debug!(city, country, "verdict cache hit");
            return Ok(verdict);
        }

        tracing::debug!(city, country, "verdict cache miss");
        let verdict = compute()?;
        self.put(city, country, verdict);
        Ok(verdict)
    }

    /// Presence check that does not touch recency.
    pub fn contains(&self, city: &str, country: &str) -> bool {
        self.entries.contains(&LocationQuery::new(city, country))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for VerdictCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
