//! Last In, First Out (LIFO) eviction policy.
//!
//! The newest insertion is the first to go, which keeps the oldest entries
//! resident indefinitely. Useful when early entries are the valuable ones,
//! e.g. warm-up data that later traffic should not displace.

use crate::error::CacheError;
use crate::fifo::InsertionQueue;
use crate::policy::EvictionPolicy;
use core::hash::Hash;

/// Evicts the key that was inserted most recently.
///
/// Accesses and in-place updates do not reorder keys. Removal of an arbitrary
/// key is O(n).
#[derive(Debug)]
pub struct LifoPolicy<K> {
    queue: InsertionQueue<K>,
}

impl<K: Hash + Eq + Clone> LifoPolicy<K> {
    /// Creates an empty LIFO policy.
    pub fn new() -> Self {
        LifoPolicy {
            queue: InsertionQueue::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Default for LifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> EvictionPolicy<K> for LifoPolicy<K> {
    #[inline]
    fn on_get(&mut self, _key: &K) {}

    fn on_put(&mut self, key: &K) {
        self.queue.push(key);
    }

    fn on_remove(&mut self, key: &K) {
        self.queue.remove(key);
    }

    fn evict(&mut self) -> Result<K, CacheError> {
        self.queue.pop_newest().ok_or(CacheError::EmptyPolicy)
    }

    #[inline]
    fn len(&self) -> usize {
        self.queue.len()
    }

    fn name(&self) -> &'static str {
        "LIFO"
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}
