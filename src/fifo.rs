//! First In, First Out (FIFO) eviction policy.
//!
//! FIFO evicts keys in the order they were first inserted. Accesses and
//! in-place updates never change a key's position, so a hot key is evicted
//! just as readily as a cold one.
//!
//! # Performance Characteristics
//!
//! - `on_get`: O(1), no-op
//! - `on_put`: O(1)
//! - `evict`: O(1)
//! - `on_remove`: O(n), linear scan of the insertion order
//!
//! The insertion queue below is shared with [`LifoPolicy`](crate::LifoPolicy),
//! which evicts from the other end.

use crate::error::CacheError;
use crate::policy::EvictionPolicy;
use core::hash::Hash;
use std::collections::VecDeque;

#[cfg(feature = "hashbrown")]
use hashbrown::HashSet;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashSet;

/// Keys in insertion order, with an index for O(1) membership checks.
///
/// Every key in `order` is in `members` and vice versa.
#[derive(Debug)]
pub(crate) struct InsertionQueue<K> {
    order: VecDeque<K>,
    members: HashSet<K>,
}

impl<K: Hash + Eq + Clone> InsertionQueue<K> {
    pub(crate) fn new() -> Self {
        InsertionQueue {
            order: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    /// Appends `key` as the newest entry. Already queued keys keep their place.
    pub(crate) fn push(&mut self, key: &K) {
        if self.members.insert(key.clone()) {
            self.order.push_back(key.clone());
        }
    }

    /// Removes the oldest key.
    pub(crate) fn pop_oldest(&mut self) -> Option<K> {
        let key = self.order.pop_front()?;
        self.members.remove(&key);
        Some(key)
    }

    /// Removes the newest key.
    pub(crate) fn pop_newest(&mut self) -> Option<K> {
        let key = self.order.pop_back()?;
        self.members.remove(&key);
        Some(key)
    }

    pub(crate) fn remove(&mut self, key: &K) {
        if !self.members.remove(key) {
            return;
        }
        if let Some(pos) = self.order.iter().position(|queued| queued == key) {
            self.order.remove(pos);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

/// Evicts the key that was inserted first.
///
/// # Examples
///
/// ```
/// use policy_cache::{EvictionPolicy, FifoPolicy};
///
/// let mut fifo = FifoPolicy::new();
/// fifo.on_put(&'a');
/// fifo.on_put(&'b');
/// fifo.on_get(&'a');
/// assert_eq!(fifo.evict(), Ok('a'));
/// ```
#[derive(Debug)]
pub struct FifoPolicy<K> {
    queue: InsertionQueue<K>,
}

impl<K: Hash + Eq + Clone> FifoPolicy<K> {
    /// Creates an empty FIFO policy.
    pub fn new() -> Self {
        FifoPolicy {
            queue: InsertionQueue::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Default for FifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> EvictionPolicy<K> for FifoPolicy<K> {
    #[inline]
    fn on_get(&mut self, _key: &K) {}

    fn on_put(&mut self, key: &K) {
        self.queue.push(key);
    }

    fn on_remove(&mut self, key: &K) {
        self.queue.remove(key);
    }

    fn evict(&mut self) -> Result<K, CacheError> {
        self.queue.pop_oldest().ok_or(CacheError::EmptyPolicy)
    }

    #[inline]
    fn len(&self) -> usize {
        self.queue.len()
    }

    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}
