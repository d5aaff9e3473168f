//! Row structure for sift collections.
//!
//! This module defines the `Row` struct which represents a single element of an
//! in-memory collection queried by sift.

use crate::error::{Error, Result};
use crate::value::Value;
use alloc::vec::Vec;

/// Identifier of an element inside its collection.
pub type RowId = u64;

/// One element of a queried collection.
///
/// Fields are positional; expressions address them through the field index carried
/// by a field path.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Identifier for this element, unique within its collection.
    id: RowId,
    /// Values stored in this element, indexed by field position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given ID and values.
    pub fn new(id: RowId, values: Vec<Value>) -> Self {
        Self { id, values }
    }

    /// Returns the row ID.
    #[inline]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value at the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the value at the given index, failing when the element is too short.
    pub fn field(&self, index: usize) -> Result<&Value> {
        self.values
            .get(index)
            .ok_or_else(|| Error::field_out_of_range(index, self.values.len()))
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_row_creation() {
        let row = Row::new(1, vec![Value::Int64(42), Value::String("test".into())]);
        assert_eq!(row.id(), 1);
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
        assert_eq!(row.values()[0], Value::Int64(42));
    }

    #[test]
    fn test_row_get() {
        let row = Row::new(1, vec![Value::Int64(42), Value::Null]);
        assert_eq!(row.get(0), Some(&Value::Int64(42)));
        assert_eq!(row.get(1), Some(&Value::Null));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_row_field_out_of_range() {
        let row = Row::new(7, vec![Value::Boolean(true)]);
        assert_eq!(row.field(0), Ok(&Value::Boolean(true)));
        assert_eq!(row.field(3), Err(Error::field_out_of_range(3, 1)));
    }
}
