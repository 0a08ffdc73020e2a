//! Readers and writers for tabulon tables.
//!
//! - [`delimited`]: CSV and other delimited text, parsed into typed columns
//!   with the string parsing pipeline
//! - [`json`]: JSON documents read as record lists, with nested objects as
//!   group columns and arrays of objects as frame columns
//!
//! Every entry point takes its options explicitly ([`CsvOptions`] or
//! [`JsonOptions`]).

pub mod delimited;
pub mod json;

pub use common_config::{CsvOptions, JsonOptions};
pub use delimited::{read_csv, read_csv_path, read_csv_str, write_csv, write_csv_path, write_csv_str};
pub use json::{read_json, read_json_path, read_json_str, write_json, write_json_path, write_json_str};
