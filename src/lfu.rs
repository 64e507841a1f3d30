//! Least Frequently Used (LFU) eviction policy.
//!
//! LFU counts how often each key is used and evicts the key with the lowest
//! count. Ties between keys with the same count are broken by recency: the
//! least recently used among them goes first.
//!
//! # Algorithm
//!
//! Keys are grouped into frequency buckets. Each bucket is an arena-backed
//! [`List`] ordered by recency, most recent at the front. A per-key entry
//! records the key's handle and current frequency, and a `min_freq` cursor
//! points at the bucket to evict from:
//!
//! ```text
//!   min_freq = 1
//!
//!   freq 1: [ d ] ◄──► [ c ]        ◄── evict takes c (tail)
//!   freq 2: [ b ]
//!   freq 4: [ a ]
//! ```
//!
//! Buckets exist only while they hold at least one key.
//!
//! # Performance Characteristics
//!
//! All events are O(1) on average. `min_freq` is maintained lazily: promotion
//! and insertion keep it exact, but `on_remove` and `evict` may leave it
//! pointing at a bucket that no longer exists. `evict` repairs the cursor when
//! it finds its bucket missing, by taking the smallest remaining frequency.
//! That scan touches one entry per distinct frequency and only runs on that
//! cold path.
//!
//! # When to Use
//!
//! LFU fits workloads with a stable set of popular keys. Keys that were hot
//! long ago keep their counts, so shifting popularity adapts slowly.

use crate::error::CacheError;
use crate::list::{Handle, List};
use crate::policy::EvictionPolicy;
use core::hash::Hash;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Where a tracked key lives: its node handle and the bucket it is in.
#[derive(Debug, Clone, Copy)]
struct FrequencyEntry {
    handle: Handle,
    frequency: usize,
}

/// Evicts the least frequently used key, breaking ties by recency.
///
/// # Examples
///
/// ```
/// use policy_cache::{EvictionPolicy, LfuPolicy};
///
/// let mut lfu = LfuPolicy::new();
/// lfu.on_put(&"hot");
/// lfu.on_put(&"cold");
/// lfu.on_get(&"hot");
/// assert_eq!(lfu.frequency(&"hot"), Some(2));
/// assert_eq!(lfu.evict(), Ok("cold"));
/// ```
#[derive(Debug)]
pub struct LfuPolicy<K> {
    buckets: HashMap<usize, List<K>>,
    entries: HashMap<K, FrequencyEntry>,
    /// Lowest frequency with keys, or stale after a removal or eviction.
    min_freq: usize,
}

impl<K: Hash + Eq + Clone> LfuPolicy<K> {
    /// Creates an empty LFU policy.
    pub fn new() -> Self {
        LfuPolicy {
            buckets: HashMap::new(),
            entries: HashMap::new(),
            min_freq: 0,
        }
    }

    /// Returns the access count recorded for `key`, if it is tracked.
    pub fn frequency(&self, key: &K) -> Option<usize> {
        self.entries.get(key).map(|entry| entry.frequency)
    }

    /// Returns the current `min_freq` cursor.
    ///
    /// After a removal or eviction this may name a bucket that no longer
    /// exists; it is corrected by the next eviction that needs it.
    pub fn min_frequency(&self) -> usize {
        self.min_freq
    }

    /// Moves a tracked key from its bucket to the front of the next one.
    fn promote(&mut self, key: &K) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        let old = entry.frequency;
        let new = old + 1;

        let Some(bucket) = self.buckets.get_mut(&old) else {
            return;
        };
        let Some(key) = bucket.remove_node(entry.handle) else {
            return;
        };
        if bucket.is_empty() {
            self.buckets.remove(&old);
            if old == self.min_freq {
                self.min_freq = new;
            }
        }

        entry.handle = self.buckets.entry(new).or_default().add_to_front(key);
        entry.frequency = new;
    }

    /// Points `min_freq` at the smallest existing bucket if its bucket is gone.
    fn repair_min_freq(&mut self) {
        if self.buckets.contains_key(&self.min_freq) {
            return;
        }
        if let Some(&lowest) = self.buckets.keys().min() {
            self.min_freq = lowest;
        }
    }
}

impl<K: Hash + Eq + Clone> Default for LfuPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> EvictionPolicy<K> for LfuPolicy<K> {
    fn on_get(&mut self, key: &K) {
        self.promote(key);
    }

    fn on_put(&mut self, key: &K) {
        if self.entries.contains_key(key) {
            self.promote(key);
            return;
        }
        let handle = self.buckets.entry(1).or_default().add_to_front(key.clone());
        self.entries.insert(
            key.clone(),
            FrequencyEntry {
                handle,
                frequency: 1,
            },
        );
        self.min_freq = 1;
    }

    fn on_remove(&mut self, key: &K) {
        let Some(entry) = self.entries.remove(key) else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(&entry.frequency) {
            bucket.remove_node(entry.handle);
            if bucket.is_empty() {
                self.buckets.remove(&entry.frequency);
            }
        }
    }

    fn evict(&mut self) -> Result<K, CacheError> {
        if self.entries.is_empty() {
            return Err(CacheError::EmptyPolicy);
        }
        self.repair_min_freq();

        let min_freq = self.min_freq;
        let bucket = self
            .buckets
            .get_mut(&min_freq)
            .ok_or(CacheError::EmptyPolicy)?;
        let key = bucket.remove_from_end().ok_or(CacheError::EmptyPolicy)?;
        if bucket.is_empty() {
            self.buckets.remove(&min_freq);
        }
        self.entries.remove(&key);
        Ok(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn name(&self) -> &'static str {
        "LFU"
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.entries.clear();
        self.min_freq = 0;
    }
}
