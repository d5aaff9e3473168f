//! Hash index implementation for sift.
//!
//! A `HashIndex` groups the elements of one collection by a computed key. It is
//! built once by fully consuming the collection and is read-only afterwards.
//! Several elements may share a key; each group keeps the relative order in
//! which its elements were added.

use crate::stats::IndexStats;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashMap;

/// Accumulates `(key, element)` pairs for a `HashIndex`.
///
/// Nothing is visible to readers until `finish` is called, so abandoning a builder
/// halfway (for example when the element source fails) leaves no trace.
#[derive(Debug)]
pub struct HashIndexBuilder<K, V> {
    map: HashMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> HashIndexBuilder<K, V> {
    /// Creates a builder sized for roughly `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Appends `value` to the group of `key`.
    pub fn add(&mut self, key: K, value: V) {
        self.map.entry(key).or_default().push(value);
    }

    /// Freezes the accumulated groups into an immutable index.
    pub fn finish(self) -> HashIndex<K, V> {
        let mut stats = IndexStats::new();
        let map = self
            .map
            .into_iter()
            .map(|(key, group)| {
                stats.add_group(group.len());
                (key, Rc::from(group))
            })
            .collect();
        HashIndex { map, stats }
    }
}

impl<K: Eq + Hash, V> Default for HashIndexBuilder<K, V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

/// An immutable multi-map from keys to ordered groups of elements.
#[derive(Debug)]
pub struct HashIndex<K, V> {
    /// The underlying map from keys to groups.
    map: HashMap<K, Rc<[V]>>,
    /// Statistics computed when the index was frozen.
    stats: IndexStats,
}

impl<K: Eq + Hash, V> HashIndex<K, V> {
    /// Builds an index by consuming every item of `items` and grouping by `key_of`.
    ///
    /// The first error, from either the sequence or the key function, aborts the build
    /// and is returned; no partial index is produced.
    pub fn try_build<I, E, F>(items: I, capacity: usize, mut key_of: F) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<V, E>>,
        F: FnMut(&V) -> Result<K, E>,
    {
        let mut builder = HashIndexBuilder::with_capacity(capacity);
        for item in items {
            let value = item?;
            let key = key_of(&value)?;
            builder.add(key, value);
        }
        Ok(builder.finish())
    }

    /// Returns the group stored under `key`, or None if no element has that key.
    pub fn get(&self, key: &K) -> Option<Group<V>> {
        self.map.get(key).map(|items| Group::new(Rc::clone(items)))
    }

    /// Returns the group stored under `key`; a missing key yields an empty group.
    pub fn lookup(&self, key: &K) -> Group<V> {
        self.get(key).unwrap_or_else(Group::empty)
    }

    /// Returns true if at least one element has `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns an iterator over the distinct keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Returns the number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.map.len()
    }

    /// Returns the total number of indexed elements.
    pub fn len(&self) -> usize {
        self.stats.total_rows()
    }

    /// Returns true if the index holds no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the statistics for this index.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }
}

/// A lazy iterator over one group of a `HashIndex`.
///
/// The group is shared with the index, so creating and cloning a `Group` never
/// copies elements.
#[derive(Debug)]
pub struct Group<V> {
    items: Rc<[V]>,
    pos: usize,
}

impl<V> Group<V> {
    fn new(items: Rc<[V]>) -> Self {
        Self { items, pos: 0 }
    }

    /// Creates a group with no elements.
    pub fn empty() -> Self {
        Self::new(Rc::from(Vec::new()))
    }

    /// Returns the elements not yet yielded.
    pub fn as_slice(&self) -> &[V] {
        &self.items[self.pos..]
    }
}

impl<V> Clone for Group<V> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
            pos: self.pos,
        }
    }
}

impl<V: Clone> Iterator for Group<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let item = self.items.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<V: Clone> ExactSizeIterator for Group<V> {}
