//! # lrucache
//!
//! Fixed-capacity key/value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to arena slot (O(1))
//! - **Recency list**: doubly-linked list threaded through the arena by
//!   slot index, bracketed by head/tail sentinels (O(1) reorder and evict)
//! - **SharedCache**: one mutex around the whole cache for callers that
//!   need to share it across threads, plus hit/miss statistics
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! assert_eq!(cache.put("c", 3), Some(("b", 2)));
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
mod lru;
mod stats;

pub use cache::SharedCache;
pub use error::{Error, Result};
pub use lru::{Iter, LruCache};
pub use stats::{CacheStats, StatsSnapshot};
