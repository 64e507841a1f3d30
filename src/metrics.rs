//! Cache Metrics
//!
//! Counters recorded by [`Cache`](crate::Cache) while it holds its lock, and
//! the [`CacheMetrics`] trait that reports them.
//!
//! Metrics are reported as a `BTreeMap` so that keys always come out in the
//! same order, which keeps test assertions and logged snapshots stable.

use std::collections::BTreeMap;

/// Event counters common to every eviction policy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Number of lookups (`get`, `get_with`).
    pub requests: u64,
    /// Lookups that found their key.
    pub cache_hits: u64,
    /// New keys stored.
    pub insertions: u64,
    /// Values overwritten for keys already present.
    pub updates: u64,
    /// Entries removed because the policy chose them as victims.
    pub evictions: u64,
    /// Entries removed explicitly with `remove`.
    pub removals: u64,
    /// Number of `clear` calls.
    pub clears: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are not stored; they are `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new key being stored.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an existing key's value being replaced.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records a victim leaving the cache.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an explicit removal of a present key.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Records a `clear`.
    pub fn record_clear(&mut self) {
        self.clears += 1;
    }

    /// Number of lookups that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0. Zero before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0. Zero before any lookup.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters and derived rates to a map keyed by metric name.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("clears".to_string(), self.clears as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.insertions > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.insertions as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for caches.
pub trait CacheMetrics {
    /// Returns all metrics as name/value pairs, sorted by name.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Name of the eviction algorithm in use, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_without_requests() {
        let metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert!(!metrics.to_btreemap().contains_key("eviction_rate"));
    }

    #[test]
    fn test_hit_and_miss_accounting() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        assert_eq!(metrics.requests, 4);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);
    }

    #[test]
    fn test_to_btreemap() {
        let mut metrics = CoreCacheMetrics::new();
        for _ in 0..4 {
            metrics.record_insertion();
        }
        metrics.record_eviction();
        metrics.record_update();
        metrics.record_removal();
        metrics.record_clear();

        let map = metrics.to_btreemap();
        assert_eq!(map["insertions"], 4.0);
        assert_eq!(map["evictions"], 1.0);
        assert_eq!(map["updates"], 1.0);
        assert_eq!(map["removals"], 1.0);
        assert_eq!(map["clears"], 1.0);
        assert_eq!(map["eviction_rate"], 0.25);

        let keys: Vec<&String> = map.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
