//! Sift Index - grouped hash indexes and the cache that shares them.
//!
//! This crate provides:
//!
//! - `HashIndex`: immutable key → group mapping with O(1) point lookups
//! - `HashIndexBuilder`: accumulates elements before freezing them into a `HashIndex`
//! - `Group`: lazy iterator over one cached group
//! - `IndexCache`: compute-once cache of indexes, shared by every context of one query
//!
//! # Example
//!
//! ```rust
//! use sift_index::{HashIndex, IndexCache};
//!
//! let words = ["apple", "avocado", "banana"];
//! let index: HashIndex<char, &str> = HashIndex::try_build(
//!     words.iter().map(|w| Ok::<_, ()>(*w)),
//!     16,
//!     |w| Ok(w.chars().next().unwrap_or(' ')),
//! )
//! .unwrap();
//!
//! assert_eq!(index.lookup(&'a').collect::<Vec<_>>(), vec!["apple", "avocado"]);
//! assert_eq!(index.lookup(&'z').count(), 0);
//!
//! let cache: IndexCache<&str, char, &str> = IndexCache::new();
//! cache.get_or_try_build(&"first_letter", || Ok::<_, ()>(index)).unwrap();
//! assert!(cache.contains(&"first_letter"));
//! ```

#![no_std]

extern crate alloc;

pub mod cache;
pub mod hash;
pub mod stats;

pub use cache::IndexCache;
pub use hash::{Group, HashIndex, HashIndexBuilder};
pub use stats::IndexStats;
