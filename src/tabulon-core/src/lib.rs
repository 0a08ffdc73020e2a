//! Core data model for tabulon.
//!
//! This crate provides the fundamental types of the table model:
//! - `Value` and `DataType` for the type system
//! - `Column` with its value, group and frame kinds
//! - `ColumnPath` addressing and the `UnresolvedColumnsPolicy`
//! - `DataFrame`, its schema projection and the string parsing pipeline

pub mod column;
pub mod frame;
pub mod name_gen;
pub mod parse;
pub mod path;
pub mod schema;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod proptest_utils;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use column::{Column, ColumnGroup, ColumnKind, FrameColumn, ValueColumn};
pub use frame::DataFrame;
pub use name_gen::ColumnNameGenerator;
pub use parse::ParseReport;
pub use path::{ColumnPath, ColumnWithPath, UnresolvedColumnsPolicy};
pub use schema::{ColumnSchema, FrameSchema};
pub use types::{DataType, Row, Value};
