//! Moving columns.

use common_error::{TabulonError, TabulonResult};
use tabulon_core::{ColumnPath, ColumnWithPath, DataFrame};

use crate::insert::{insert_impl, ColumnToInsert};
use crate::remove::remove_impl;
use crate::selector::ColumnSet;
use crate::tree::ColumnPosition;

/// Columns selected for a move, waiting for a destination.
#[derive(Debug, Clone)]
pub struct MoveClause<'a> {
    df: &'a DataFrame,
    columns: ColumnSet,
}

impl<'a> MoveClause<'a> {
    /// Select `columns` of `df` for moving.
    pub fn new(df: &'a DataFrame, columns: impl Into<ColumnSet>) -> Self {
        Self {
            df,
            columns: columns.into(),
        }
    }

    /// Move each column to the path computed from it.
    pub fn into<F>(self, new_path: F) -> TabulonResult<DataFrame>
    where
        F: Fn(&ColumnWithPath) -> ColumnPath,
    {
        self.relocate(false, new_path)
    }

    /// Move the columns into the group at `group`, created if missing.
    pub fn under(&self, group: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        let group = group.into();
        self.relocate(true, |_| group.clone())
    }

    /// Move the columns to the top level.
    pub fn to_top(&self) -> TabulonResult<DataFrame> {
        self.relocate(false, |c| ColumnPath::from(c.name()))
    }

    /// Move the columns right after the column at `target`, into its group.
    pub fn after(&self, target: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        self.next_to(&target.into(), false)
    }

    /// Move the columns right before the column at `target`, into its group.
    pub fn before(&self, target: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        self.next_to(&target.into(), true)
    }

    /// Move the columns to the top level at `index`. Indices past the end
    /// append.
    pub fn to(&self, index: usize) -> TabulonResult<DataFrame> {
        let removal = remove_impl(self.df, &self.columns, false)?;
        if removal.removed.is_empty() {
            return Ok(self.df.clone());
        }
        let mut columns = removal.df.columns().to_vec();
        let at = index.min(columns.len());
        columns.splice(at..at, removal.removed.into_iter().map(|r| r.column));
        DataFrame::with_nrow(columns, self.df.nrow())
    }

    /// Move the columns to the start of the top level.
    pub fn to_start(&self) -> TabulonResult<DataFrame> {
        self.to(0)
    }

    /// Move the columns to the end of the top level.
    pub fn to_end(&self) -> TabulonResult<DataFrame> {
        self.to(usize::MAX)
    }

    fn relocate<F>(&self, under: bool, new_path: F) -> TabulonResult<DataFrame>
    where
        F: Fn(&ColumnWithPath) -> ColumnPath,
    {
        let removal = remove_impl(self.df, &self.columns, false)?;
        let inserts = removal
            .removed
            .into_iter()
            .map(|r| {
                let source = ColumnWithPath::new(r.path, r.column);
                let mut path = new_path(&source);
                if under {
                    path = path.child(source.name());
                }
                let (_, column) = source.into_parts()?;
                Ok(ColumnToInsert::new(path, column).with_reference(r.node))
            })
            .collect::<TabulonResult<Vec<_>>>()?;
        insert_impl(&removal.df, inserts, Some(&removal.tree))
    }

    fn next_to(&self, target: &ColumnPath, before: bool) -> TabulonResult<DataFrame> {
        // Positions of the target and its ancestors, before anything moves.
        let mut positions = Vec::with_capacity(target.len());
        for depth in 1..=target.len() {
            let prefix = target.take(depth);
            let parent = self.df.frame_at_path(&prefix.parent())?;
            let name = prefix.name().unwrap_or_default();
            let index = parent
                .column_index(name)
                .ok_or_else(|| TabulonError::column_not_found(format!("column '{prefix}' not found")))?;
            positions.push(ColumnPosition::kept(index, parent.columns()[index].clone()));
        }
        if positions.is_empty() {
            return Err(TabulonError::invalid_parameter(
                "cannot move columns next to the empty path",
            ));
        }

        let mut removal = remove_impl(self.df, &self.columns, false)?;
        if removal.removed.is_empty() {
            return Ok(self.df.clone());
        }
        if let Some(source) = removal
            .removed
            .iter()
            .find(|r| target.len() > r.path.len() && target.starts_with(&r.path))
        {
            return Err(TabulonError::invalid_parameter(format!(
                "cannot move column '{}' next to its own child '{target}'",
                source.path
            )));
        }

        let reference = removal
            .tree
            .get_or_put(target, |prefix| positions[prefix.len() - 1].clone());
        let parent = target.parent();
        let inserts = removal
            .removed
            .into_iter()
            .map(|r| {
                let column = ColumnToInsert::new(parent.child(r.name()), r.column);
                if before {
                    column.with_reference_before(reference)
                } else {
                    column.with_reference(reference)
                }
            })
            .collect();
        insert_impl(&removal.df, inserts, Some(&removal.tree))
    }
}
