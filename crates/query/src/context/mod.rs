//! Evaluation contexts.
//!
//! A context answers "which elements of this source should the executor iterate?".
//! `SimpleIndexSupport` always answers with a full scan. `IndexedContext` answers
//! from a shared cache of hash indexes for the sources its condition pins to a
//! single key, and falls back to the full scan for everything else.
//!
//! ```text
//!              root IndexedContext ── Rc<PathCache> ──┐
//!               /                \                    │ shared
//!   specialize(cond A)    specialize(cond B)          │
//!   registrations: {cat}  registrations: {cat, dog} ──┘
//! ```

mod discovery;
mod indexed;
mod simple;

pub use discovery::IndexCreationTask;
pub use indexed::{IndexedContext, IndexedPath, PathCache, PathIndex};
pub use simple::SimpleIndexSupport;

use crate::ast::Expr;
use crate::error::QueryResult;
use crate::eval::Binding;
use crate::source::ElementIter;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use sift_core::Row;
use sift_index::Group;

/// The lazy result of resolving a source expression.
pub enum Elements<'a> {
    /// Every element of the source, straight from the element source.
    Scan(ElementIter<'a>),
    /// The cached group of elements matching an index key.
    Indexed(Group<Rc<Row>>),
    /// An index lookup that matched no element.
    Empty,
}

impl Elements<'_> {
    /// Returns true if the result came from an index (including a lookup miss).
    pub fn is_indexed(&self) -> bool {
        !matches!(self, Elements::Scan(_))
    }

    /// Drains the sequence, stopping at the first failure.
    pub fn into_rows(self) -> QueryResult<Vec<Rc<Row>>> {
        self.collect()
    }
}

impl Iterator for Elements<'_> {
    type Item = QueryResult<Rc<Row>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Elements::Scan(iter) => iter.next(),
            Elements::Indexed(group) => group.next().map(Ok),
            Elements::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Elements::Scan(iter) => iter.size_hint(),
            Elements::Indexed(group) => group.size_hint(),
            Elements::Empty => (0, Some(0)),
        }
    }
}

impl fmt::Debug for Elements<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elements::Scan(_) => f.write_str("Elements::Scan(..)"),
            Elements::Indexed(group) => f
                .debug_tuple("Elements::Indexed")
                .field(&group.as_slice().len())
                .finish(),
            Elements::Empty => f.write_str("Elements::Empty"),
        }
    }
}

/// Resolves source expressions to the elements an executor should iterate.
pub trait IndexSupport {
    /// Resolves `expr` without bindings.
    fn resolve(&self, expr: &Expr) -> QueryResult<Elements<'_>>;

    /// Resolves `expr` given the current binding vector.
    fn resolve_with(&self, expr: &Expr, bindings: &[Binding]) -> QueryResult<Elements<'_>>;
}
