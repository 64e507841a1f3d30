//! Error types for the cache and its eviction policies.
//!
//! Absent keys are never errors: `get` returns `None` and `remove` returns
//! `false`. The variants below cover invalid construction, eviction from an
//! empty policy, and the states that indicate a policy has drifted away from
//! the cache's key set.

use thiserror::Error;

/// Errors produced by [`Cache`](crate::Cache) and the eviction policies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The cache was constructed with a capacity of zero.
    #[error("cache capacity must be positive")]
    InvalidCapacity,

    /// `evict` was called on a policy that is not tracking any keys.
    #[error("eviction policy is not tracking any keys")]
    EmptyPolicy,

    /// The policy selected a victim that the cache does not hold.
    #[error("eviction policy selected a victim that is not cached")]
    UntrackedVictim,

    /// The policy tracks a different number of keys than the cache holds.
    #[error("policy tracks {tracked} keys but the cache holds {cached}")]
    PolicyDesync {
        /// Entries in the cache's value mapping.
        cached: usize,
        /// Keys tracked by the eviction policy.
        tracked: usize,
    },

    /// The cache holds more entries than its capacity allows.
    #[error("cache holds {len} entries but its capacity is {capacity}")]
    CapacityExceeded {
        /// Entries currently held.
        len: usize,
        /// Configured capacity.
        capacity: usize,
    },

    /// A policy name could not be parsed into a [`PolicyKind`](crate::PolicyKind).
    #[error("unknown eviction policy {0:?}, expected one of fifo, lifo, lru, lfu")]
    UnknownPolicy(String),
}
