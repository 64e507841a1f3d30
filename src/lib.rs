#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Policy Selection Guide
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Which eviction policy should I use?             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  Do recently used keys tend to be used again? ──Yes──▶  LRU     │
//! │          │                                                      │
//! │          No                                                     │
//! │          ▼                                                      │
//! │  Is a small set of keys popular for a long time? ──Yes──▶ LFU   │
//! │          │                                                      │
//! │          No                                                     │
//! │          ▼                                                      │
//! │  Should old entries make room for new ones? ──Yes──▶ FIFO       │
//! │          │                                                      │
//! │          No ──▶ LIFO (keep the earliest entries)                │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Policy | Evicts | `on_remove` | Best Use Case |
//! |--------|--------|-------------|---------------|
//! | [`FifoPolicy`] | Oldest insertion | O(n) | Streams, time-ordered data |
//! | [`LifoPolicy`] | Newest insertion | O(n) | Pinning warm-up data |
//! | [`LruPolicy`]  | Least recently used | O(1) | General purpose |
//! | [`LfuPolicy`]  | Least frequently used | O(1) | Stable popularity |
//!
//! ## Code Examples
//!
//! ### From a configuration
//!
//! ```rust
//! use policy_cache::{Cache, CacheConfig, PolicyKind};
//!
//! let config = CacheConfig {
//!     capacity: 2,
//!     policy: PolicyKind::Lfu,
//! };
//! let cache = Cache::init(config).unwrap();
//! cache.put("rare", 1).unwrap();
//! cache.put("popular", 2).unwrap();
//! for _ in 0..10 {
//!     cache.get(&"popular");
//! }
//! cache.put("new", 3).unwrap(); // "rare" evicted (lowest frequency)
//! assert!(cache.get(&"rare").is_none());
//! ```
//!
//! ### With a custom policy
//!
//! Anything implementing [`EvictionPolicy`] can drive a cache:
//!
//! ```rust
//! use policy_cache::{Cache, CacheError, EvictionPolicy};
//!
//! /// Evicts the smallest key.
//! #[derive(Default)]
//! struct SmallestFirst(std::collections::BTreeSet<u32>);
//!
//! impl EvictionPolicy<u32> for SmallestFirst {
//!     fn on_get(&mut self, _key: &u32) {}
//!     fn on_put(&mut self, key: &u32) {
//!         self.0.insert(*key);
//!     }
//!     fn on_remove(&mut self, key: &u32) {
//!         self.0.remove(key);
//!     }
//!     fn evict(&mut self) -> Result<u32, CacheError> {
//!         self.0.pop_first().ok_or(CacheError::EmptyPolicy)
//!     }
//!     fn len(&self) -> usize {
//!         self.0.len()
//!     }
//!     fn name(&self) -> &'static str {
//!         "SMALLEST"
//!     }
//! }
//!
//! let cache = Cache::new(2, SmallestFirst::default()).unwrap();
//! cache.put(7, "seven").unwrap();
//! cache.put(3, "three").unwrap();
//! assert_eq!(cache.put(9, "nine"), Ok(Some((3, "three"))));
//! ```

/// Doubly linked list stored in a slot arena.
///
/// Internal infrastructure for the LRU and LFU policies.
pub(crate) mod list;

/// Error type shared by the cache and its policies.
pub mod error;

/// Cache configuration structures.
pub mod config;

/// The eviction policy trait and the built-in policy enum.
pub mod policy;

/// First In, First Out eviction.
pub mod fifo;

/// Last In, First Out eviction.
pub mod lifo;

/// Least Recently Used eviction.
pub mod lru;

/// Least Frequently Used eviction with recency tie-breaking.
pub mod lfu;

/// Cache metrics system.
pub mod metrics;

/// The thread-safe cache.
pub mod cache;

pub use cache::Cache;
pub use config::{CacheConfig, PolicyKind};
pub use error::CacheError;
pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lifo::LifoPolicy;
pub use lru::LruPolicy;
pub use metrics::{CacheMetrics, CoreCacheMetrics};
pub use policy::{EvictionPolicy, Policy};
