//! Grouping and ungrouping.

use common_error::TabulonResult;
use tabulon_core::{ColumnPath, DataFrame};

use crate::selector::ColumnSet;

use super::MoveClause;

/// Columns selected for grouping.
#[derive(Debug, Clone)]
pub struct GroupClause<'a> {
    df: &'a DataFrame,
    columns: ColumnSet,
}

impl<'a> GroupClause<'a> {
    /// Select `columns` of `df` for grouping.
    pub fn new(df: &'a DataFrame, columns: impl Into<ColumnSet>) -> Self {
        Self {
            df,
            columns: columns.into(),
        }
    }

    /// Wrap the columns into the group at `group`. The group is created
    /// where the first grouped column was, or extended when it exists.
    pub fn into(self, group: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        MoveClause::new(self.df, self.columns).under(group)
    }
}

/// Move the children of the selected groups one level up. Groups left empty
/// disappear.
pub(crate) fn ungroup(df: &DataFrame, columns: ColumnSet) -> TabulonResult<DataFrame> {
    MoveClause::new(df, columns.cols_in_groups()).into(|c| {
        let path = c.path();
        if path.len() < 2 {
            path.clone()
        } else {
            path.remove_at(path.len() - 2)
        }
    })
}
