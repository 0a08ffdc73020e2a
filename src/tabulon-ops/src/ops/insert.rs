//! Adding a new column at a chosen place.

use common_error::TabulonResult;
use tabulon_core::{Column, ColumnPath, DataFrame};

use crate::insert::{insert_impl, ColumnToInsert};

use super::MoveClause;

/// A column waiting for its place in a table.
#[derive(Debug, Clone)]
pub struct InsertClause<'a> {
    df: &'a DataFrame,
    column: Column,
}

impl<'a> InsertClause<'a> {
    /// Prepare `column` for insertion into `df`.
    pub const fn new(df: &'a DataFrame, column: Column) -> Self {
        Self { df, column }
    }

    /// Insert at `path`, renaming the column to the last segment. Missing
    /// groups are created.
    pub fn into(self, path: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        insert_impl(self.df, vec![ColumnToInsert::new(path, self.column)], None)
    }

    /// Append to the group at `group`, created if missing.
    pub fn under(&self, group: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        let path = group.into().child(self.column.name());
        insert_impl(self.df, vec![ColumnToInsert::new(path, self.column.clone())], None)
    }

    /// Insert right after the column at `target`, in the same group.
    pub fn after(&self, target: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        let target = target.into();
        let path = target.parent().child(self.column.name());
        let added = insert_impl(
            self.df,
            vec![ColumnToInsert::new(path.clone(), self.column.clone())],
            None,
        )?;
        MoveClause::new(&added, path).after(target)
    }

    /// Insert at top-level position `index`. Indices past the end append.
    pub fn at(&self, index: usize) -> TabulonResult<DataFrame> {
        let path = ColumnPath::from(self.column.name());
        let added = insert_impl(
            self.df,
            vec![ColumnToInsert::new(path.clone(), self.column.clone())],
            None,
        )?;
        MoveClause::new(&added, path).to(index)
    }
}
