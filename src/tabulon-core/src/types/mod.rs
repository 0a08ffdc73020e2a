//! Type system for tabulon values.
//!
//! This module defines the `Value` enum for cell values and `DataType` for
//! column type information, with invariant checking in `invariants.rs` and type
//! guessing in `infer.rs`.

mod data_type;
mod infer;
mod invariants;
mod value;

pub use data_type::DataType;
pub use infer::{guess_type, TypeGuess};
pub use invariants::{check_type_invariants, coerce_value};
pub use value::{Row, Value};
