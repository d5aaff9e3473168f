//! Shared cache of built hash indexes.
//!
//! One `IndexCache` is shared by reference between every evaluation context derived
//! from the same root context. Each key is built at most once per cache lifetime and
//! the built index is read-only afterwards.
//!
//! The cache uses interior mutability without locking and is neither `Send` nor
//! `Sync`: it belongs to a single query execution. Callers that want several
//! executions to share built indexes must serialize the first build of each key
//! themselves.

use crate::hash::HashIndex;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::hash::Hash;
use hashbrown::HashMap;

/// Compute-once cache mapping an indexed path `P` to its `HashIndex<K, V>`.
#[derive(Debug)]
pub struct IndexCache<P, K, V> {
    entries: RefCell<HashMap<P, Rc<HashIndex<K, V>>>>,
    /// Number of indexes inserted since creation.
    builds: Cell<usize>,
}

impl<P: Eq + Hash + Clone, K: Eq + Hash, V> IndexCache<P, K, V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            builds: Cell::new(0),
        }
    }

    /// Returns the index cached for `path`.
    pub fn get(&self, path: &P) -> Option<Rc<HashIndex<K, V>>> {
        self.entries.borrow().get(path).cloned()
    }

    /// Returns true if an index for `path` has been built.
    pub fn contains(&self, path: &P) -> bool {
        self.entries.borrow().contains_key(path)
    }

    /// Returns the index for `path`, running `build` only if none is cached yet.
    ///
    /// `build` runs without any borrow of the cache held. If it fails the error is
    /// returned and the cache is left exactly as it was.
    pub fn get_or_try_build<E, F>(&self, path: &P, build: F) -> Result<Rc<HashIndex<K, V>>, E>
    where
        F: FnOnce() -> Result<HashIndex<K, V>, E>,
    {
        if let Some(existing) = self.get(path) {
            return Ok(existing);
        }

        let built = Rc::new(build()?);
        let mut entries = self.entries.borrow_mut();
        // A reentrant build of the same path may have won; the first insert stays.
        let entry = entries.entry(path.clone()).or_insert_with(|| {
            self.builds.set(self.builds.get() + 1);
            built
        });
        Ok(Rc::clone(entry))
    }

    /// Returns the number of cached indexes.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns a snapshot of the cached paths.
    pub fn paths(&self) -> Vec<P> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Returns how many indexes have been built and inserted.
    pub fn builds(&self) -> usize {
        self.builds.get()
    }
}

impl<P: Eq + Hash + Clone, K: Eq + Hash, V> Default for IndexCache<P, K, V> {
    fn default() -> Self {
        Self::new()
    }
}
