//! Structural transforms for tabulon tables.
//!
//! `tabulon-ops` turns "which columns" and "where should they go" into new
//! tables. Every operation composes from two primitives:
//!
//! - [`remove_impl`] detaches the selected columns, records where each one
//!   sat in a [`RemovalTree`] and returns the residual table;
//! - [`insert_impl`] attaches columns at target paths, creating missing
//!   groups and placing each column next to its recorded position.
//!
//! # Overview
//!
//! - [`selector`]: the composable [`ColumnSet`] selector
//! - [`tree`]: the removal tree recording original positions
//! - [`remove`] / [`insert`]: the engine
//! - [`ops`]: the [`FrameOps`] extension trait with move, group, ungroup,
//!   flatten, split, merge, insert, rename, select, parse and pivot
//!
//! # Example
//!
//! ```rust
//! use tabulon_core::{Column, DataFrame, DataType, Value};
//! use tabulon_ops::FrameOps;
//!
//! let df = DataFrame::new(vec![
//!     Column::new_value("name", vec![Value::from("Alice")], DataType::String).unwrap(),
//!     Column::new_value("age", vec![Value::Int32(30)], DataType::Int32).unwrap(),
//! ])
//! .unwrap();
//!
//! let grouped = df.group(["name", "age"]).into("info").unwrap();
//! assert_eq!(grouped.column_names(), vec!["info"]);
//!
//! let flat = grouped.ungroup("info").unwrap();
//! assert_eq!(flat, df);
//! ```

pub mod insert;
pub mod ops;
pub mod remove;
pub mod selector;
pub mod tree;

// Re-export commonly used types
pub use insert::{insert_impl, ColumnToInsert};
pub use ops::FrameOps;
pub use remove::{remove_impl, RemovalResult, RemovedColumn};
pub use selector::{ChainElement, ColumnSet};
pub use tree::{ColumnPosition, NodeId, RemovalTree};
