//! Thread-safe, fixed-capacity cache with a pluggable eviction policy.
//!
//! [`Cache`] pairs a key-value map with an [`EvictionPolicy`] and guards both
//! with one lock:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Cache                                        │
//! │                                              │
//! │  capacity ─ fixed at construction            │
//! │                                              │
//! │  ┌────────────────── Mutex ───────────────┐  │
//! │  │  map: HashMap<K, V>                    │  │
//! │  │  policy: P (FIFO | LIFO | LRU | LFU)   │  │
//! │  │  metrics: CoreCacheMetrics             │  │
//! │  └────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes `&self`, holds the lock for its whole duration, and
//! keeps two properties true whenever the lock is released:
//!
//! - the map never holds more than `capacity` entries
//! - the policy tracks exactly the keys in the map
//!
//! # Thread Safety
//!
//! `Cache` is `Send + Sync` when its keys, values, policy and hasher are
//! `Send`, so it is shared across threads with `Arc`. All threads serialize on
//! the single lock, which bounds throughput under heavy contention.
//!
//! # Example
//!
//! ```
//! use policy_cache::{Cache, Policy, PolicyKind};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(Cache::new(100, Policy::new(PolicyKind::Lru)).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for j in 0..50 {
//!                 cache.put(format!("key-{i}-{j}"), j).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 100);
//! ```

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::{EvictionPolicy, Policy};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, error, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// State guarded by the cache lock.
struct CacheInner<K, V, P, S> {
    map: HashMap<K, V, S>,
    policy: P,
    metrics: CoreCacheMetrics,
}

impl<K, V, P, S> CacheInner<K, V, P, S>
where
    K: Hash + Eq,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    /// Asks the policy for a victim and removes it from the map.
    fn evict_one(&mut self) -> Result<(K, V), CacheError> {
        let victim = self.policy.evict()?;
        match self.map.remove_entry(&victim) {
            Some(entry) => {
                self.metrics.record_eviction();
                trace!(policy = self.policy.name(), len = self.map.len(), "evicted entry");
                Ok(entry)
            }
            None => {
                error!(
                    policy = self.policy.name(),
                    len = self.map.len(),
                    "eviction policy selected a key that is not cached"
                );
                Err(CacheError::UntrackedVictim)
            }
        }
    }
}

/// A fixed-capacity key-value cache whose eviction order is decided by `P`.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`; the built-in policies also
///   require `Clone`.
/// - `V`: Value type. [`get`](Self::get) requires `Clone`.
/// - `P`: Eviction policy. Defaults to the built-in [`Policy`] enum.
/// - `S`: Hash builder for the map. Defaults to `DefaultHashBuilder`.
///
/// # Examples
///
/// ```
/// use policy_cache::{Cache, Policy, PolicyKind};
///
/// let cache = Cache::new(2, Policy::new(PolicyKind::Lru)).unwrap();
/// cache.put("a", 1).unwrap();
/// cache.put("b", 2).unwrap();
/// assert_eq!(cache.get(&"a"), Some(1));
///
/// // "b" is now the least recently used entry
/// assert_eq!(cache.put("c", 3), Ok(Some(("b", 2))));
/// assert!(!cache.contains_key(&"b"));
/// ```
pub struct Cache<K, V, P = Policy<K>, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    inner: Mutex<CacheInner<K, V, P, S>>,
}

impl<K, V> Cache<K, V, Policy<K>, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
{
    /// Creates a cache from a configuration, using the built-in policy it names.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `config.capacity` is zero.
    pub fn init(config: CacheConfig) -> Result<Self, CacheError> {
        Self::new(config.capacity, config.policy.build())
    }
}

impl<K, V, P> Cache<K, V, P, DefaultHashBuilder>
where
    K: Hash + Eq,
    P: EvictionPolicy<K>,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, policy: P) -> Result<Self, CacheError> {
        Self::with_hasher(capacity, policy, DefaultHashBuilder::default())
    }
}

impl<K, V, P, S> Cache<K, V, P, S>
where
    K: Hash + Eq,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    /// Creates an empty cache that hashes keys with `hash_builder`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_hasher(capacity: usize, policy: P, hash_builder: S) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity)?;
        debug!(capacity = capacity.get(), policy = policy.name(), "created cache");
        Ok(Cache {
            capacity,
            inner: Mutex::new(CacheInner {
                map: HashMap::with_capacity_and_hasher(capacity.get(), hash_builder),
                policy,
                metrics: CoreCacheMetrics::new(),
            }),
        })
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns the number of entries currently held.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().map.is_empty()
    }

    /// Returns the name of the eviction policy, e.g. `"LFU"`.
    pub fn policy_name(&self) -> &'static str {
        self.inner.lock().policy.name()
    }

    /// Returns a clone of the value for `key` and records the access with the
    /// policy. A miss has no effect on the policy.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Applies `f` to the value for `key` while holding the lock.
    ///
    /// Counts as an access, exactly like [`get`](Self::get), but avoids the
    /// clone. `f` must not call back into this cache.
    ///
    /// # Example
    ///
    /// ```
    /// use policy_cache::{Cache, Policy, PolicyKind};
    ///
    /// let cache = Cache::new(4, Policy::new(PolicyKind::Fifo)).unwrap();
    /// cache.put(1, String::from("hello")).unwrap();
    /// assert_eq!(cache.get_with(&1, |value| value.len()), Some(5));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match inner.map.get_key_value(key) {
            Some((key, value)) => {
                inner.policy.on_get(key);
                inner.metrics.record_hit();
                Some(f(value))
            }
            None => {
                inner.metrics.record_miss();
                None
            }
        }
    }

    /// Returns `true` if `key` is cached. The policy is not notified.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().map.contains_key(key)
    }

    /// Inserts or updates an entry.
    ///
    /// Updating a present key replaces its value and counts as an access. A new
    /// key arriving at a full cache first evicts the victim the policy picks.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((key, old_value)))` if the key was already present
    /// - `Ok(Some((victim_key, victim_value)))` if an entry was evicted
    /// - `Ok(None)` if the key was inserted into free space
    ///
    /// # Errors
    ///
    /// Fails only if the policy has drifted away from the cache's key set:
    /// [`CacheError::EmptyPolicy`] or [`CacheError::UntrackedVictim`]. The new
    /// entry is not inserted in that case.
    ///
    /// On `UntrackedVictim` the policy has already dropped the key it named.
    /// That key was never in the map, so every cached entry is left in place
    /// and the cache is still full. The policy now tracks one key fewer, and
    /// [`check_invariants`](Self::check_invariants) reports the remaining
    /// mismatch.
    pub fn put(&self, key: K, value: V) -> Result<Option<(K, V)>, CacheError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Some(slot) = inner.map.get_mut(&key) {
            let old = mem::replace(slot, value);
            inner.policy.on_get(&key);
            inner.metrics.record_update();
            return Ok(Some((key, old)));
        }

        let mut evicted = None;
        if inner.map.len() >= self.capacity.get() {
            match inner.evict_one() {
                Ok(entry) => evicted = Some(entry),
                Err(err) => {
                    error!(
                        policy = inner.policy.name(),
                        len = inner.map.len(),
                        tracked = inner.policy.len(),
                        %err,
                        "eviction failed on a full cache"
                    );
                    return Err(err);
                }
            }
        }

        inner.policy.on_put(&key);
        inner.map.insert(key, value);
        inner.metrics.record_insertion();
        Ok(evicted)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match inner.map.remove_entry(key) {
            Some((key, _)) => {
                inner.policy.on_remove(&key);
                inner.metrics.record_removal();
                true
            }
            None => false,
        }
    }

    /// Removes every entry and resets the policy with
    /// [`EvictionPolicy::clear`].
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let dropped = inner.map.len();
        inner.map.clear();
        inner.policy.clear();
        inner.metrics.record_clear();
        debug!(policy = inner.policy.name(), dropped, "cleared cache");
    }

    /// Evicts one entry chosen by the policy, as if the cache were full.
    ///
    /// Calling this until it fails drains the cache in eviction order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyPolicy`] when the cache is empty, and
    /// [`CacheError::UntrackedVictim`] under the same conditions as
    /// [`put`](Self::put), leaving the map untouched.
    pub fn evict(&self) -> Result<(K, V), CacheError> {
        self.inner.lock().evict_one()
    }

    /// Verifies that the cache is within capacity and that the policy tracks
    /// as many keys as the cache holds.
    ///
    /// Only the counts are compared. A policy holding the wrong keys in the
    /// right number passes; draining with [`evict`](Self::evict) until it
    /// fails surfaces that as [`CacheError::UntrackedVictim`].
    ///
    /// # Errors
    ///
    /// [`CacheError::CapacityExceeded`] or [`CacheError::PolicyDesync`].
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        let inner = self.inner.lock();
        let len = inner.map.len();
        if len > self.capacity.get() {
            return Err(CacheError::CapacityExceeded {
                len,
                capacity: self.capacity.get(),
            });
        }
        let tracked = inner.policy.len();
        if tracked != len {
            error!(policy = inner.policy.name(), cached = len, tracked, "policy out of sync");
            return Err(CacheError::PolicyDesync {
                cached: len,
                tracked,
            });
        }
        Ok(())
    }
}

impl<K, V, P, S> CacheMetrics for Cache<K, V, P, S>
where
    K: Hash + Eq,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let inner = self.inner.lock();
        let mut metrics = inner.metrics.to_btreemap();
        metrics.insert("capacity".to_string(), self.capacity.get() as f64);
        metrics.insert("entries".to_string(), inner.map.len() as f64);
        metrics.insert(
            "utilization".to_string(),
            inner.map.len() as f64 / self.capacity.get() as f64,
        );
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        self.inner.lock().policy.name()
    }
}

impl<K, V, P, S> fmt::Debug for Cache<K, V, P, S>
where
    P: EvictionPolicy<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Cache");
        out.field("capacity", &self.capacity);
        match self.inner.try_lock() {
            Some(inner) => out
                .field("len", &inner.map.len())
                .field("policy", &inner.policy.name()),
            None => out.field("inner", &format_args!("<locked>")),
        };
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyKind;
    use crate::lru::LruPolicy;
    use std::collections::HashSet;

    fn cache<V>(capacity: usize, kind: PolicyKind) -> Cache<i32, V> {
        Cache::new(capacity, Policy::new(kind)).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result: Result<Cache<i32, i32>, _> = Cache::new(0, Policy::new(PolicyKind::Lru));
        assert_eq!(result.err(), Some(CacheError::InvalidCapacity));

        let config = CacheConfig {
            capacity: 0,
            policy: PolicyKind::Fifo,
        };
        assert!(Cache::<u8, u8>::init(config).is_err());
    }

    #[test]
    fn test_put_returns_evicted_or_previous() {
        let cache = cache(2, PolicyKind::Fifo);
        assert_eq!(cache.put(1, "one"), Ok(None));
        assert_eq!(cache.put(2, "two"), Ok(None));
        assert_eq!(cache.put(1, "uno"), Ok(Some((1, "one"))));
        assert_eq!(cache.put(3, "three"), Ok(Some((1, "uno"))));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some("three"));
    }

    #[test]
    fn test_update_counts_as_access() {
        let cache = cache(2, PolicyKind::Lru);
        cache.put(1, 10).unwrap();
        cache.put(2, 20).unwrap();
        cache.put(1, 11).unwrap();
        assert_eq!(cache.put(3, 30), Ok(Some((2, 20))));
        assert_eq!(cache.get(&1), Some(11));
    }

    #[test]
    fn test_miss_leaves_policy_untouched() {
        let cache = cache(2, PolicyKind::Lfu);
        cache.put(1, 1).unwrap();
        assert_eq!(cache.get(&5), None);
        assert!(cache.check_invariants().is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_contains_key_does_not_touch_policy() {
        let cache = cache(2, PolicyKind::Lru);
        cache.put(1, ()).unwrap();
        cache.put(2, ()).unwrap();
        assert!(cache.contains_key(&1));
        // 1 is still the least recently used
        assert_eq!(cache.put(3, ()), Ok(Some((1, ()))));
    }

    #[test]
    fn test_remove() {
        let cache = cache(3, PolicyKind::Lru);
        cache.put(1, 'a').unwrap();
        cache.put(2, 'b').unwrap();
        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        assert!(!cache.remove(&9));
        assert_eq!(cache.len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_clear_empties_policy() {
        for kind in PolicyKind::ALL {
            let cache = cache(4, kind);
            for key in 0..4 {
                cache.put(key, key).unwrap();
            }
            cache.clear();
            assert!(cache.is_empty());
            cache.check_invariants().unwrap();
            assert_eq!(cache.evict(), Err(CacheError::EmptyPolicy));

            // refilling after a clear evicts normally
            for key in 10..15 {
                cache.put(key, key).unwrap();
            }
            assert_eq!(cache.len(), 4);
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_evict_drains_every_key_once() {
        for kind in PolicyKind::ALL {
            let cache = cache(8, kind);
            for key in 0..8 {
                cache.put(key, key * 2).unwrap();
            }
            cache.get(&3);
            cache.remove(&5);
            let mut seen = HashSet::new();
            while let Ok((key, value)) = cache.evict() {
                assert_eq!(value, key * 2);
                assert!(seen.insert(key), "{kind} evicted {key} twice");
            }
            assert_eq!(seen.len(), 7);
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn test_custom_policy_type() {
        let cache: Cache<&str, u32, LruPolicy<&str>> =
            Cache::new(1, LruPolicy::new()).unwrap();
        cache.put("a", 1).unwrap();
        assert_eq!(cache.put("b", 2), Ok(Some(("a", 1))));
        assert_eq!(cache.policy_name(), "LRU");

        let boxed: Box<dyn EvictionPolicy<&str> + Send> = Box::new(LruPolicy::new());
        let cache = Cache::new(1, boxed).unwrap();
        cache.put("x", 0).unwrap();
        assert_eq!(cache.put("y", 1), Ok(Some(("x", 0))));
    }

    /// Evicts a key the cache never stored.
    struct Liar;

    impl EvictionPolicy<i32> for Liar {
        fn on_get(&mut self, _key: &i32) {}
        fn on_put(&mut self, _key: &i32) {}
        fn on_remove(&mut self, _key: &i32) {}
        fn evict(&mut self) -> Result<i32, CacheError> {
            Ok(-1)
        }
        fn len(&self) -> usize {
            0
        }
        fn name(&self) -> &'static str {
            "LIAR"
        }
    }

    #[test]
    fn test_desynced_policy_is_reported() {
        let cache = Cache::new(1, Liar).unwrap();
        cache.put(1, 1).unwrap();
        assert_eq!(cache.put(2, 2), Err(CacheError::UntrackedVictim));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(1));
        assert!(!cache.contains_key(&2));
        assert_eq!(
            cache.check_invariants(),
            Err(CacheError::PolicyDesync {
                cached: 1,
                tracked: 0
            })
        );
    }

    /// Tracks the right number of keys under the wrong names.
    struct Misnamed(Vec<i32>);

    impl EvictionPolicy<i32> for Misnamed {
        fn on_get(&mut self, _key: &i32) {}
        fn on_put(&mut self, key: &i32) {
            self.0.push(key + 100);
        }
        fn on_remove(&mut self, key: &i32) {
            self.0.retain(|tracked| *tracked != key + 100);
        }
        fn evict(&mut self) -> Result<i32, CacheError> {
            if self.0.is_empty() {
                return Err(CacheError::EmptyPolicy);
            }
            Ok(self.0.remove(0))
        }
        fn len(&self) -> usize {
            self.0.len()
        }
        fn name(&self) -> &'static str {
            "MISNAMED"
        }
    }

    #[test]
    fn test_untracked_victim_leaves_map_intact() {
        let cache = Cache::new(2, Misnamed(Vec::new())).unwrap();
        cache.put(1, 'a').unwrap();
        cache.put(2, 'b').unwrap();
        // counts agree even though the names do not
        cache.check_invariants().unwrap();

        assert_eq!(cache.put(3, 'c'), Err(CacheError::UntrackedVictim));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some('a'));
        assert_eq!(cache.get(&2), Some('b'));
        assert!(!cache.contains_key(&3));
        // the policy dropped its victim, the map did not
        assert_eq!(
            cache.check_invariants(),
            Err(CacheError::PolicyDesync {
                cached: 2,
                tracked: 1
            })
        );

        assert_eq!(cache.evict(), Err(CacheError::UntrackedVictim));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.evict(), Err(CacheError::EmptyPolicy));

        // clear brings the two back in line
        cache.clear();
        cache.check_invariants().unwrap();
        assert_eq!(cache.put(4, 'd'), Ok(None));
    }

    #[test]
    fn test_clear_large_cache() {
        const N: i32 = 50_000;
        for kind in PolicyKind::ALL {
            let cache = cache(N as usize, kind);
            for key in 0..N {
                cache.put(key, key).unwrap();
            }
            cache.get(&7);
            assert_eq!(cache.len(), N as usize);

            cache.clear();
            assert!(cache.is_empty(), "{kind}");
            cache.check_invariants().unwrap();
            assert_eq!(cache.evict(), Err(CacheError::EmptyPolicy));

            // no stale order survives the clear
            cache.put(N, 0).unwrap();
            cache.put(0, 0).unwrap();
            assert_eq!(cache.len(), 2);
            let mut drained = HashSet::new();
            while let Ok((key, _)) = cache.evict() {
                drained.insert(key);
            }
            assert_eq!(drained, HashSet::from([0, N]), "{kind}");
        }
    }

    #[test]
    fn test_metrics() {
        let cache = cache(2, PolicyKind::Lfu);
        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();
        cache.get(&1);
        cache.get(&7);
        cache.put(3, 3).unwrap();
        cache.put(3, 4).unwrap();
        cache.remove(&3);

        let metrics = cache.metrics();
        assert_eq!(metrics["requests"], 2.0);
        assert_eq!(metrics["cache_hits"], 1.0);
        assert_eq!(metrics["insertions"], 3.0);
        assert_eq!(metrics["updates"], 1.0);
        assert_eq!(metrics["evictions"], 1.0);
        assert_eq!(metrics["removals"], 1.0);
        assert_eq!(metrics["entries"], 1.0);
        assert_eq!(metrics["capacity"], 2.0);
        assert_eq!(cache.algorithm_name(), "LFU");
    }

    #[test]
    fn test_get_with_counts_as_access() {
        let cache = cache(2, PolicyKind::Lru);
        cache.put(1, vec![1, 2, 3]).unwrap();
        cache.put(2, vec![]).unwrap();
        assert_eq!(cache.get_with(&1, Vec::len), Some(3));
        assert_eq!(cache.put(3, vec![]), Ok(Some((2, vec![]))));
    }

    #[test]
    fn test_debug_output() {
        let cache = cache::<u8>(3, PolicyKind::Fifo);
        cache.put(1, 1).unwrap();
        let text = format!("{cache:?}");
        assert!(text.contains("capacity: 3"));
        assert!(text.contains("len: 1"));
        assert!(text.contains("FIFO"));
    }
}
