//! Binding vector slots.

use crate::error::{QueryError, QueryResult};
use alloc::rc::Rc;
use sift_core::{Row, Value};

/// One slot of a binding vector.
///
/// Slots line up with the source expressions an evaluator was compiled against:
/// a root source is bound to its current element, a parameter to its value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Binding {
    /// Nothing bound yet, e.g. a source the executor has not reached.
    #[default]
    Unbound,
    /// The current element of a root source.
    Element(Rc<Row>),
    /// The value of a parameter.
    Value(Value),
}

impl Binding {
    /// Returns true if the slot holds an element or a value.
    pub fn is_bound(&self) -> bool {
        !matches!(self, Binding::Unbound)
    }

    pub(crate) fn element_at(bindings: &[Binding], slot: usize) -> QueryResult<&Row> {
        match bindings.get(slot) {
            Some(Binding::Element(row)) => Ok(&**row),
            Some(Binding::Value(_)) => Err(QueryError::binding(slot, "expected an element")),
            Some(Binding::Unbound) | None => Err(QueryError::binding(slot, "unbound")),
        }
    }

    pub(crate) fn value_at(bindings: &[Binding], slot: usize) -> QueryResult<&Value> {
        match bindings.get(slot) {
            Some(Binding::Value(value)) => Ok(value),
            Some(Binding::Element(_)) => Err(QueryError::binding(slot, "expected a value")),
            Some(Binding::Unbound) | None => Err(QueryError::binding(slot, "unbound")),
        }
    }
}

impl From<Value> for Binding {
    fn from(value: Value) -> Self {
        Binding::Value(value)
    }
}

impl From<Rc<Row>> for Binding {
    fn from(row: Rc<Row>) -> Self {
        Binding::Element(row)
    }
}
