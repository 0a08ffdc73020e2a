//! Error types and result aliases for tabulon.
//!
//! Every fallible operation in the workspace returns [`TabulonResult`]. The
//! variants of [`TabulonError`] follow the taxonomy of structural, resolution,
//! type and degenerate-input failures.

mod error;

pub use error::{GenericError, TabulonError, TabulonResult};
