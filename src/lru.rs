//! Least Recently Used (LRU) eviction policy.
//!
//! LRU keeps keys ordered by recency of use and evicts the one that has gone
//! longest without an access. It suits workloads with temporal locality: keys
//! used recently are likely to be used again soon.
//!
//! # Algorithm
//!
//! Keys live in an arena-backed [`List`] with the most recently used key at
//! the front. A map from key to [`Handle`] lets every event reach its node in
//! O(1):
//!
//! - `on_get` / `on_put` of a tracked key: move the node to the front
//! - `on_put` of a new key: insert at the front
//! - `evict`: detach the tail
//! - `on_remove`: detach the node wherever it is
//!
//! # When to Use
//!
//! LRU is a good general-purpose default. It degrades on scans, where a long
//! run of one-off keys flushes the whole working set.

use crate::error::CacheError;
use crate::list::{Handle, List};
use crate::policy::EvictionPolicy;
use core::hash::Hash;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Evicts the least recently used key.
///
/// # Examples
///
/// ```
/// use policy_cache::{EvictionPolicy, LruPolicy};
///
/// let mut lru = LruPolicy::new();
/// lru.on_put(&1);
/// lru.on_put(&2);
/// lru.on_get(&1);
/// assert_eq!(lru.evict(), Ok(2));
/// ```
#[derive(Debug)]
pub struct LruPolicy<K> {
    list: List<K>,
    handles: HashMap<K, Handle>,
}

impl<K: Hash + Eq + Clone> LruPolicy<K> {
    /// Creates an empty LRU policy.
    pub fn new() -> Self {
        LruPolicy {
            list: List::new(),
            handles: HashMap::new(),
        }
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.handles.get(key) {
            Some(&handle) => self.list.move_to_front(handle),
            None => false,
        }
    }
}

impl<K: Hash + Eq + Clone> Default for LruPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> EvictionPolicy<K> for LruPolicy<K> {
    fn on_get(&mut self, key: &K) {
        self.touch(key);
    }

    fn on_put(&mut self, key: &K) {
        if !self.touch(key) {
            let handle = self.list.add_to_front(key.clone());
            self.handles.insert(key.clone(), handle);
        }
    }

    fn on_remove(&mut self, key: &K) {
        if let Some(handle) = self.handles.remove(key) {
            self.list.remove_node(handle);
        }
    }

    fn evict(&mut self) -> Result<K, CacheError> {
        let key = self.list.remove_from_end().ok_or(CacheError::EmptyPolicy)?;
        self.handles.remove(&key);
        Ok(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.list.len()
    }

    fn name(&self) -> &'static str {
        "LRU"
    }

    fn clear(&mut self) {
        self.list.clear();
        self.handles.clear();
    }
}
