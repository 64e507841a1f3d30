//! The eviction policy contract and the closed set of built-in policies.
//!
//! A policy is a strategy object that only sees three events from the cache
//! (`on_get`, `on_put`, `on_remove`) and answers one question (`evict`). It
//! never touches the cache's values, and at every moment it must track exactly
//! the keys the cache holds.
//!
//! Two ways to plug a policy into a [`Cache`](crate::Cache):
//!
//! - [`Policy`]: an enum over the four built-in strategies, selected at runtime
//!   from a [`PolicyKind`]. This is the cache's default policy type.
//! - Any type implementing [`EvictionPolicy`], including boxed trait objects
//!   such as `Box<dyn EvictionPolicy<K> + Send>`.
//!
//! | Policy | `on_get` | `on_put` (existing key) | `evict` | `on_remove` |
//! |--------|----------|-------------------------|---------|-------------|
//! | FIFO   | no-op    | no-op                   | oldest insertion, O(1) | O(n) |
//! | LIFO   | no-op    | no-op                   | newest insertion, O(1) | O(n) |
//! | LRU    | move to front | move to front      | least recent, O(1) | O(1) |
//! | LFU    | promote  | promote                 | lowest frequency, LRU tie-break, O(1) | O(1) |

use crate::config::PolicyKind;
use crate::error::CacheError;
use crate::fifo::FifoPolicy;
use crate::lfu::LfuPolicy;
use crate::lifo::LifoPolicy;
use crate::lru::LruPolicy;
use core::hash::Hash;

/// Strategy that decides which key leaves a full cache.
///
/// The cache calls these methods while holding its lock, so implementations
/// never need their own synchronization.
pub trait EvictionPolicy<K> {
    /// Records an access to `key`. Unknown keys are ignored.
    fn on_get(&mut self, key: &K);

    /// Records that `key` was inserted or, for an already tracked key,
    /// updated in place.
    fn on_put(&mut self, key: &K);

    /// Forgets everything about `key`. Unknown keys are ignored.
    fn on_remove(&mut self, key: &K);

    /// Selects the next victim and stops tracking it.
    ///
    /// Returns [`CacheError::EmptyPolicy`] when no keys are tracked.
    fn evict(&mut self) -> Result<K, CacheError>;

    /// Returns the number of keys currently tracked.
    fn len(&self) -> usize;

    /// Returns `true` if no keys are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name used in logs and metrics, e.g. `"LRU"`.
    fn name(&self) -> &'static str;

    /// Forgets every tracked key.
    ///
    /// The default evicts until `evict` fails, so it relies on `evict`
    /// eventually returning [`CacheError::EmptyPolicy`]. Implementations that
    /// can drop their state wholesale should override it.
    fn clear(&mut self) {
        while self.evict().is_ok() {}
    }
}

impl<K, P: EvictionPolicy<K> + ?Sized> EvictionPolicy<K> for Box<P> {
    #[inline]
    fn on_get(&mut self, key: &K) {
        (**self).on_get(key)
    }

    #[inline]
    fn on_put(&mut self, key: &K) {
        (**self).on_put(key)
    }

    #[inline]
    fn on_remove(&mut self, key: &K) {
        (**self).on_remove(key)
    }

    #[inline]
    fn evict(&mut self) -> Result<K, CacheError> {
        (**self).evict()
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn clear(&mut self) {
        (**self).clear()
    }
}

/// One of the four built-in eviction policies.
///
/// # Examples
///
/// ```
/// use policy_cache::{EvictionPolicy, Policy, PolicyKind};
///
/// let mut policy: Policy<&str> = Policy::new(PolicyKind::Lru);
/// policy.on_put(&"a");
/// policy.on_put(&"b");
/// policy.on_get(&"a");
/// assert_eq!(policy.evict(), Ok("b"));
/// ```
#[derive(Debug)]
pub enum Policy<K> {
    /// First in, first out.
    Fifo(FifoPolicy<K>),
    /// Last in, first out.
    Lifo(LifoPolicy<K>),
    /// Least recently used.
    Lru(LruPolicy<K>),
    /// Least frequently used.
    Lfu(LfuPolicy<K>),
}

impl<K: Hash + Eq + Clone> Policy<K> {
    /// Creates an empty policy of the given kind.
    pub fn new(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Fifo => Policy::Fifo(FifoPolicy::new()),
            PolicyKind::Lifo => Policy::Lifo(LifoPolicy::new()),
            PolicyKind::Lru => Policy::Lru(LruPolicy::new()),
            PolicyKind::Lfu => Policy::Lfu(LfuPolicy::new()),
        }
    }
}

impl<K> Policy<K> {
    /// Returns which of the built-in strategies this is.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fifo(_) => PolicyKind::Fifo,
            Policy::Lifo(_) => PolicyKind::Lifo,
            Policy::Lru(_) => PolicyKind::Lru,
            Policy::Lfu(_) => PolicyKind::Lfu,
        }
    }
}

impl<K: Hash + Eq + Clone> EvictionPolicy<K> for Policy<K> {
    fn on_get(&mut self, key: &K) {
        match self {
            Policy::Fifo(p) => p.on_get(key),
            Policy::Lifo(p) => p.on_get(key),
            Policy::Lru(p) => p.on_get(key),
            Policy::Lfu(p) => p.on_get(key),
        }
    }

    fn on_put(&mut self, key: &K) {
        match self {
            Policy::Fifo(p) => p.on_put(key),
            Policy::Lifo(p) => p.on_put(key),
            Policy::Lru(p) => p.on_put(key),
            Policy::Lfu(p) => p.on_put(key),
        }
    }

    fn on_remove(&mut self, key: &K) {
        match self {
            Policy::Fifo(p) => p.on_remove(key),
            Policy::Lifo(p) => p.on_remove(key),
            Policy::Lru(p) => p.on_remove(key),
            Policy::Lfu(p) => p.on_remove(key),
        }
    }

    fn evict(&mut self) -> Result<K, CacheError> {
        match self {
            Policy::Fifo(p) => p.evict(),
            Policy::Lifo(p) => p.evict(),
            Policy::Lru(p) => p.evict(),
            Policy::Lfu(p) => p.evict(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Policy::Fifo(p) => p.len(),
            Policy::Lifo(p) => p.len(),
            Policy::Lru(p) => p.len(),
            Policy::Lfu(p) => p.len(),
        }
    }

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn clear(&mut self) {
        match self {
            Policy::Fifo(p) => p.clear(),
            Policy::Lifo(p) => p.clear(),
            Policy::Lru(p) => p.clear(),
            Policy::Lfu(p) => p.clear(),
        }
    }
}

impl<K> From<FifoPolicy<K>> for Policy<K> {
    fn from(policy: FifoPolicy<K>) -> Self {
        Policy::Fifo(policy)
    }
}

impl<K> From<LifoPolicy<K>> for Policy<K> {
    fn from(policy: LifoPolicy<K>) -> Self {
        Policy::Lifo(policy)
    }
}

impl<K> From<LruPolicy<K>> for Policy<K> {
    fn from(policy: LruPolicy<K>) -> Self {
        Policy::Lru(policy)
    }
}

impl<K> From<LfuPolicy<K>> for Policy<K> {
    fn from(policy: LfuPolicy<K>) -> Self {
        Policy::Lfu(policy)
    }
}
