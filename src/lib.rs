//! Tabulon - typed in-memory tables with nested column groups
//!
//! Tabulon stores data as columns of three kinds (scalar values, nested
//! row groups and nested tables), addresses them by path, restructures
//! them through one remove/insert engine and reads untyped text into typed
//! columns with a cascade of parsers.
//!
//! ```rust
//! use tabulon::prelude::*;
//!
//! let df = read_csv_str("name,age\nAlice,30\nBob,25\n", &CsvOptions::default()).unwrap();
//! let grouped = df.group(["name", "age"]).into("info").unwrap();
//! assert_eq!(grouped.column_names(), vec!["info"]);
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export member crates
pub use common_config as config;
pub use common_display as display;
pub use common_error as error;
pub use tabulon_core as core;
pub use tabulon_io as io;
pub use tabulon_ops as ops;

/// Tabulon version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The types and traits most programs need.
pub mod prelude {
    pub use common_config::{ColType, CsvOptions, JsonOptions, ParserOptions, TabulonConfig};
    pub use common_error::{TabulonError, TabulonResult};
    pub use tabulon_core::{
        Column, ColumnPath, ColumnWithPath, DataFrame, DataType, Row, UnresolvedColumnsPolicy,
        Value,
    };
    pub use tabulon_io::{read_csv_str, read_json_str, write_csv_str, write_json_str};
    pub use tabulon_ops::{ColumnSet, FrameOps};
}
