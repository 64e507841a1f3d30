//! Cache Configuration Module
//!
//! Configuration for [`Cache`](crate::Cache) is a plain struct with public
//! fields: create it with every field set and hand it to
//! [`Cache::init`](crate::Cache::init).
//!
//! The eviction strategy is chosen with a [`PolicyKind`], which can also be
//! parsed from a string so that it can come from a command line flag or a
//! settings file.
//!
//! # Sizing
//!
//! `capacity` is a count of entries, not bytes. Each entry costs the key and
//! value plus a few words of bookkeeping in the map and the policy, and the
//! FIFO, LIFO, LRU and LFU policies each hold a clone of every key.
//!
//! # Examples
//!
//! ```
//! use policy_cache::config::{CacheConfig, PolicyKind};
//! use policy_cache::Cache;
//!
//! let config = CacheConfig {
//!     capacity: 1000,
//!     policy: "lfu".parse().unwrap(),
//! };
//! let cache: Cache<String, Vec<u8>> = Cache::init(config).unwrap();
//! assert_eq!(cache.policy_name(), "LFU");
//! assert_eq!(config.policy, PolicyKind::Lfu);
//! ```

use crate::error::CacheError;
use crate::policy::Policy;
use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

/// The built-in eviction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Evict the oldest insertion.
    Fifo,
    /// Evict the newest insertion.
    Lifo,
    /// Evict the least recently used key.
    Lru,
    /// Evict the least frequently used key, least recent among ties.
    Lfu,
}

impl PolicyKind {
    /// Every kind, in declaration order.
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fifo,
        PolicyKind::Lifo,
        PolicyKind::Lru,
        PolicyKind::Lfu,
    ];

    /// Upper-case short name, e.g. `"LRU"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lifo => "LIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
        }
    }

    /// Creates an empty policy of this kind.
    pub fn build<K: Hash + Eq + Clone>(self) -> Policy<K> {
        Policy::new(self)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CacheError::UnknownPolicy(s.to_string()))
    }
}

/// Configuration for a [`Cache`](crate::Cache).
///
/// # Fields
///
/// - `capacity`: Maximum number of entries. Must be positive;
///   [`Cache::init`](crate::Cache::init) rejects zero.
/// - `policy`: Which eviction strategy decides the victim when the cache is
///   full.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
    /// Eviction strategy.
    pub policy: PolicyKind,
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .finish()
    }
}
