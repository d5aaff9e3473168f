//! Sift Query - index-accelerated evaluation of query expressions.
//!
//! This crate provides:
//!
//! - `ast`: Expressions, paths, operators and the operation registry
//! - `eval`: Compilation of expressions into static or bound evaluators
//! - `source`: The element source contract and an in-memory implementation
//! - `context`: Fallback and index-aware evaluation contexts, index discovery
//! - `executor`: A nested-loop query runner built on the contexts
//! - `config`: Index configuration
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use sift_core::{Row, Value};
//! use sift_query::ast::{Expr, OperationRegistry};
//! use sift_query::context::{IndexSupport, IndexedContext};
//! use sift_query::source::InMemorySource;
//!
//! let source = InMemorySource::new().with_collection(
//!     "cat",
//!     vec![
//!         Row::new(1, vec![Value::from("a"), Value::Int64(1)]),
//!         Row::new(2, vec![Value::from("b"), Value::Int64(2)]),
//!     ],
//! );
//! let root = Rc::new(IndexedContext::new(
//!     Rc::new(source),
//!     OperationRegistry::default(),
//!     vec![Expr::root("cat")],
//! ));
//!
//! let cond = Expr::eq(Expr::field("cat", "val", 1), Expr::constant(2i64));
//! let ctx = root.specialize(Some(&cond)).unwrap();
//! assert!(ctx.is_indexed(&Expr::root("cat")));
//!
//! let ids: Vec<u64> = ctx
//!     .resolve(&Expr::root("cat"))
//!     .unwrap()
//!     .map(|row| row.unwrap().id())
//!     .collect();
//! assert_eq!(ids, vec![2]);
//! ```

#![no_std]

extern crate alloc;

pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod executor;
pub mod source;

pub use config::IndexConfig;
pub use error::{QueryError, QueryResult};
