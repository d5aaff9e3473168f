//! AST module for query expressions and the operation registry.

mod expr;
mod ops;

pub use expr::{Expr, Operator, Path};
pub use ops::OperationRegistry;
