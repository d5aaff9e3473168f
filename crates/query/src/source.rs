//! Element sources: the only channel to the queried collections.

use crate::ast::Path;
use crate::error::{QueryError, QueryResult};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use sift_core::Row;

/// A lazy sequence of elements. Each item may fail independently, which lets a
/// source report an enumeration failure halfway through a collection.
pub type ElementIter<'a> = Box<dyn Iterator<Item = QueryResult<Rc<Row>>> + 'a>;

/// Supplies the elements of a root source.
///
/// Implementations must be deterministic for the duration of one query execution:
/// the same root yields the same elements in the same order. Hash indexes built
/// from a source are never refreshed, so the collection must not change while
/// contexts built over it are alive.
pub trait ElementSource {
    /// Returns the elements of the source `root` is rooted at.
    fn elements(&self, root: &Path) -> QueryResult<ElementIter<'_>>;
}

impl<S: ElementSource + ?Sized> ElementSource for Rc<S> {
    fn elements(&self, root: &Path) -> QueryResult<ElementIter<'_>> {
        (**self).elements(root)
    }
}

/// Element source over named in-memory collections.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    collections: BTreeMap<String, Vec<Rc<Row>>>,
}

impl InMemorySource {
    /// Creates a new empty in-memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the collection `name`.
    pub fn add_collection(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.collections
            .insert(name.into(), rows.into_iter().map(Rc::new).collect());
    }

    /// Builder-style variant of `add_collection`.
    pub fn with_collection(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.add_collection(name, rows);
        self
    }

    /// Returns the number of elements in `name`, if the collection exists.
    pub fn len(&self, name: &str) -> Option<usize> {
        self.collections.get(name).map(Vec::len)
    }
}

impl ElementSource for InMemorySource {
    fn elements(&self, root: &Path) -> QueryResult<ElementIter<'_>> {
        let rows = self
            .collections
            .get(root.root_name())
            .ok_or_else(|| QueryError::UnknownSource(root.root_name().into()))?;
        Ok(Box::new(rows.iter().cloned().map(Ok::<_, QueryError>)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use sift_core::Value;

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new().with_collection(
            "cat",
            vec![
                Row::new(1, vec![Value::from("a")]),
                Row::new(2, vec![Value::from("b")]),
            ],
        );

        let ids: Vec<u64> = source
            .elements(&Path::field("cat", "name", 0))
            .unwrap()
            .map(|r| r.unwrap().id())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(source.len("cat"), Some(2));
        assert_eq!(source.len("dog"), None);
    }

    #[test]
    fn test_unknown_collection() {
        let source = InMemorySource::new();
        assert_eq!(
            source.elements(&Path::root("dog")).err(),
            Some(QueryError::UnknownSource("dog".into()))
        );
    }
}
