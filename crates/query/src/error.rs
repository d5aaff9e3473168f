//! Error type for query evaluation.

use crate::ast::Operator;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use sift_core::Value;

/// Result type for query evaluation.
pub type QueryResult<T> = core::result::Result<T, QueryError>;

/// Errors raised while compiling expressions, building indexes or evaluating queries.
///
/// Lookup misses and conditions that cannot be indexed are not errors: they
/// produce empty results and unindexed contexts respectively.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// Value or element access failed.
    #[error(transparent)]
    Core(#[from] sift_core::Error),
    /// A path is rooted at a source that is not in scope.
    #[error("Unknown source: {0}")]
    UnknownSource(String),
    /// A parameter is not declared by the query.
    #[error("Unknown parameter: ?{0}")]
    UnknownParam(String),
    /// An expression that does not denote a source was resolved as one.
    #[error("Not a source expression: {0}")]
    NotASource(String),
    /// A root path was used where a value is required.
    #[error("Source {0} does not denote a value")]
    NotAValue(String),
    /// An operator received an unsupported number of arguments.
    #[error("Operator {op} cannot take {got} argument(s)")]
    Arity { op: Operator, got: usize },
    /// An operator received an operand of an unsupported type.
    #[error("Operator {op} cannot be applied to {value}")]
    InvalidOperand { op: Operator, value: Value },
    /// Integer arithmetic overflowed.
    #[error("Integer overflow in {op}")]
    Overflow { op: Operator },
    /// Integer division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// A binding slot was missing, unbound or of the wrong kind.
    #[error("Binding slot {slot}: {reason}")]
    Binding { slot: usize, reason: &'static str },
    /// A binding-dependent index key was looked up without bindings.
    #[error("Index key for {0} depends on bindings")]
    MissingBindings(String),
    /// Computing the index key of an element failed while building an index.
    #[error("Cannot compute index key {path}: {cause}")]
    IndexKey { path: String, cause: Box<QueryError> },
    /// The element source failed to enumerate a collection.
    #[error("Element source failed for {collection}: {message}")]
    Source { collection: String, message: String },
    /// The query and its arguments do not fit together.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl QueryError {
    /// Creates an element source error.
    pub fn source_failed(collection: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Source {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Wraps a key evaluation failure raised while indexing `path`.
    pub fn index_key(path: &impl ToString, cause: QueryError) -> Self {
        QueryError::IndexKey {
            path: path.to_string(),
            cause: Box::new(cause),
        }
    }

    pub(crate) fn binding(slot: usize, reason: &'static str) -> Self {
        QueryError::Binding { slot, reason }
    }
}
