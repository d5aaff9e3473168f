//! Evaluator compilation.
//!
//! `compile` turns an expression plus the ordered list of source expressions in
//! scope into an `Evaluator`: a pure function from a binding vector (one slot per
//! source expression) to a `Value`. Whether the function reads any slot is decided
//! here, once, and encoded in the evaluator's type.

mod binding;
mod compile;
mod ops;

pub use binding::Binding;
pub use compile::{compile, BoundEvaluator, Evaluator, StaticEvaluator};
pub(crate) use compile::root_slot;
