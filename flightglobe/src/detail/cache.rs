//! Bounded in-memory cache of resolved flight records.
//!
//! Entries are keyed by ICAO24 address. When the cache is full, the entry
//! with the oldest access stamp is evicted. Access stamps come from a
//! monotonic counter rather than wall-clock time so ordering is exact even
//! for accesses within the same instant.

use std::collections::HashMap;

use crate::state::FlightRecord;

/// Default number of cached flight records.
pub const DEFAULT_DETAIL_CACHE_CAPACITY: usize = 512;

/// Hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub inserts: u64,
}

impl DetailCacheStats {
    /// Hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    record: FlightRecord,
    last_access: u64,
}

/// LRU-bounded map from ICAO24 address to its last resolved [`FlightRecord`].
#[derive(Debug, Clone)]
pub struct DetailCache {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    clock: u64,
    stats: DetailCacheStats,
}

impl Default for DetailCache {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_CACHE_CAPACITY)
    }
}

impl DetailCache {
    /// Create a cache holding at most `capacity` records (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            capacity,
            clock: 0,
            stats: DetailCacheStats::default(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up a record, refreshing its recency. Counts a hit or a miss.
    pub fn get(&mut self, icao24: &str) -> Option<FlightRecord> {
        let stamp = self.tick();
        match self.entries.get_mut(icao24) {
            Some(entry) => {
                entry.last_access = stamp;
                self.stats.hits += 1;
                Some(entry.record.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up a record without touching recency or counters.
    pub fn peek(&self, icao24: &str) -> Option<&FlightRecord> {
        self.entries.get(icao24).map(|entry| &entry.record)
    }

    pub fn contains(&self, icao24: &str) -> bool {
        self.entries.contains_key(icao24)
    }

    /// Insert or replace a record, evicting the least recently used entry if full.
    pub fn insert(&mut self, icao24: &str, record: FlightRecord) {
        let stamp = self.tick();

        if !self.entries.contains_key(icao24) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.entries.insert(
            icao24.to_string(),
            CacheEntry {
                record,
                last_access: stamp,
            },
        );
        self.stats.inserts += 1;
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions += 1;
            tracing::trace!(icao24 = %key, "Evicted flight record from cache");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> DetailCacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
