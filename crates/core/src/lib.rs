//! Sift Core - value and element types shared by the sift crates.
//!
//! This crate provides the foundational types the index and query crates operate on:
//!
//! - `DataType`: Tag of a non-null value (Boolean, Int64, Float64, String, DateTime)
//! - `Value`: Runtime values read from elements, produced by evaluators and used as index keys
//! - `Row`: One element of an in-memory collection
//! - `Error`: Error types for value and element access
//!
//! # Example
//!
//! ```rust
//! use sift_core::{Row, Value};
//!
//! let row = Row::new(1, vec![Value::String("a".into()), Value::Int64(1)]);
//!
//! assert_eq!(row.id(), 1);
//! assert_eq!(row.get(1), Some(&Value::Int64(1)));
//! assert_eq!(row.field(0).unwrap().as_str(), Some("a"));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod row;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::{Row, RowId};
pub use types::DataType;
pub use value::Value;
