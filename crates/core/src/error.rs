//! Error types for sift core operations.

use crate::types::DataType;

/// Result type alias for core operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for value and element access.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A value had a different type than the operation requires.
    #[error("Type mismatch: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        expected: DataType,
        /// `None` when the value was null.
        got: Option<DataType>,
    },
    /// A field index past the end of an element.
    #[error("Field {index} out of range for element with {len} fields")]
    FieldOutOfRange { index: usize, len: usize },
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: DataType, got: Option<DataType>) -> Self {
        Error::TypeMismatch { expected, got }
    }

    /// Creates a field out of range error.
    pub fn field_out_of_range(index: usize, len: usize) -> Self {
        Error::FieldOutOfRange { index, len }
    }
}
