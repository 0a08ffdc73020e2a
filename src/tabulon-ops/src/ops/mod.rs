//! Table operations built on the remove/insert engine.
//!
//! [`FrameOps`] adds the operations to [`DataFrame`]. Operations that take
//! further arguments return a clause (for example [`MoveClause`]) whose
//! terminal methods produce the new table; the source table is never
//! modified.

mod flatten;
mod group;
mod insert;
mod merge;
mod move_cols;
mod pivot;
mod select;
mod split;

pub use group::GroupClause;
pub use insert::InsertClause;
pub use merge::MergeClause;
pub use move_cols::MoveClause;
pub use pivot::Pivot;
pub use split::{value_to_list, SplitClause};

use common_config::ParserOptions;
use common_error::TabulonResult;
use tabulon_core::{Column, ColumnPath, DataFrame};

use crate::selector::ColumnSet;

/// Structural operations on tables.
pub trait FrameOps {
    /// Drop the selected columns. Missing columns fail.
    fn remove(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame>;

    /// Keep only the selected columns, as top-level columns in selection
    /// order.
    fn select(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame>;

    /// Move the selected columns.
    fn move_cols(&self, columns: impl Into<ColumnSet>) -> MoveClause<'_>;

    /// Wrap the selected columns into a new group.
    fn group(&self, columns: impl Into<ColumnSet>) -> GroupClause<'_>;

    /// Replace the selected groups by their children.
    fn ungroup(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame>;

    /// Replace the selected groups by their leaf columns, at any depth.
    fn flatten(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame>;

    /// Like [`FrameOps::flatten`], naming each leaf `name.parent`.
    fn flatten_keep_parent_names(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame>;

    /// Split each selected column into several.
    fn split(&self, columns: impl Into<ColumnSet>) -> SplitClause<'_>;

    /// Combine the selected columns into one.
    fn merge(&self, columns: impl Into<ColumnSet>) -> MergeClause<'_>;

    /// Insert a new column.
    fn insert(&self, column: Column) -> InsertClause<'_>;

    /// Rename the column at `path`, keeping its position.
    fn rename(&self, path: impl Into<ColumnPath>, new_name: &str) -> TabulonResult<DataFrame>;

    /// Run the parsing pipeline over the selected columns.
    fn parse_cols(
        &self,
        columns: impl Into<ColumnSet>,
        options: &ParserOptions,
    ) -> TabulonResult<DataFrame>;

    /// Pivot on the selected key columns.
    fn pivot(&self, columns: impl Into<ColumnSet>) -> Pivot<'_>;
}

impl FrameOps for DataFrame {
    fn remove(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame> {
        select::remove(self, &columns.into())
    }

    fn select(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame> {
        select::select(self, &columns.into())
    }

    fn move_cols(&self, columns: impl Into<ColumnSet>) -> MoveClause<'_> {
        MoveClause::new(self, columns)
    }

    fn group(&self, columns: impl Into<ColumnSet>) -> GroupClause<'_> {
        GroupClause::new(self, columns)
    }

    fn ungroup(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame> {
        group::ungroup(self, columns.into())
    }

    fn flatten(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame> {
        flatten::flatten_impl(self, &columns.into(), false)
    }

    fn flatten_keep_parent_names(&self, columns: impl Into<ColumnSet>) -> TabulonResult<DataFrame> {
        flatten::flatten_impl(self, &columns.into(), true)
    }

    fn split(&self, columns: impl Into<ColumnSet>) -> SplitClause<'_> {
        SplitClause::new(self, columns)
    }

    fn merge(&self, columns: impl Into<ColumnSet>) -> MergeClause<'_> {
        MergeClause::new(self, columns)
    }

    fn insert(&self, column: Column) -> InsertClause<'_> {
        InsertClause::new(self, column)
    }

    fn rename(&self, path: impl Into<ColumnPath>, new_name: &str) -> TabulonResult<DataFrame> {
        select::rename(self, path.into(), new_name)
    }

    fn parse_cols(
        &self,
        columns: impl Into<ColumnSet>,
        options: &ParserOptions,
    ) -> TabulonResult<DataFrame> {
        select::parse_cols(self, &columns.into(), options)
    }

    fn pivot(&self, columns: impl Into<ColumnSet>) -> Pivot<'_> {
        Pivot::new(self, columns)
    }
}
