//! Merging several columns into one.

use std::fmt;
use std::sync::Arc;

use common_error::{TabulonError, TabulonResult};
use tabulon_core::{
    Column, ColumnNameGenerator, ColumnPath, DataFrame, UnresolvedColumnsPolicy, Value,
};

use crate::remove::remove_impl;
use crate::selector::ColumnSet;

use super::MoveClause;

type MergeFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Columns selected for merging.
#[derive(Clone)]
pub struct MergeClause<'a> {
    df: &'a DataFrame,
    columns: ColumnSet,
    not_null: bool,
    transform: MergeFn,
}

impl fmt::Debug for MergeClause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeClause")
            .field("columns", &self.columns)
            .field("not_null", &self.not_null)
            .finish_non_exhaustive()
    }
}

impl<'a> MergeClause<'a> {
    /// Select `columns` of `df` for merging into list cells.
    pub fn new(df: &'a DataFrame, columns: impl Into<ColumnSet>) -> Self {
        Self {
            df,
            columns: columns.into(),
            not_null: false,
            transform: Arc::new(|values: &[Value]| Value::List(values.to_vec())),
        }
    }

    /// Drop null cells, and group cells whose fields are all null, before
    /// merging.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Join the cells as text with `separator`.
    #[must_use]
    pub fn by(self, separator: &str) -> Self {
        let separator = separator.to_string();
        self.with(move |values| {
            Value::String(
                values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(&separator),
            )
        })
    }

    /// Combine the cells of each row with `transform`.
    #[must_use]
    pub fn with<F>(mut self, transform: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.transform = Arc::new(transform);
        self
    }

    /// Merged value of every row, without changing the table.
    pub fn into_list(self) -> TabulonResult<Vec<Value>> {
        let selected = self.columns.resolve(self.df, UnresolvedColumnsPolicy::Fail)?;
        let columns = selected
            .iter()
            .map(|c| c.column())
            .collect::<TabulonResult<Vec<_>>>()?;
        Ok((0..self.df.nrow())
            .map(|row| {
                let cells: Vec<Value> = columns
                    .iter()
                    .map(|c| c.get(row).unwrap_or(Value::Null))
                    .collect();
                self.combine(cells)
            })
            .collect())
    }

    /// Replace the columns by one merged column at `path`, placed where the
    /// first merged column was. An existing column at `path` is replaced.
    pub fn into(self, path: impl Into<ColumnPath>) -> TabulonResult<DataFrame> {
        let target = path.into();
        let Some(target_name) = target.name().map(str::to_string) else {
            return Err(TabulonError::invalid_parameter(
                "cannot merge into the empty path",
            ));
        };
        if self
            .columns
            .resolve(self.df, UnresolvedColumnsPolicy::Fail)?
            .is_empty()
        {
            return Ok(self.df.clone());
        }

        let exists = self
            .df
            .resolve(&target, UnresolvedColumnsPolicy::Skip)?
            .is_some();
        let merge_path = if exists {
            let mut generator = ColumnNameGenerator::new(self.df.column_names());
            ColumnPath::from(generator.add_unique("temp"))
        } else {
            target.clone()
        };

        let grouped = MoveClause::new(self.df, self.columns.clone()).under(merge_path.clone())?;
        let group = grouped
            .column_at_path(&merge_path)?
            .as_group()
            .ok_or_else(|| TabulonError::internal(format!("'{merge_path}' is not a group after merging")))?;
        let values = (0..group.len())
            .map(|row| {
                let cells = group
                    .get(row)
                    .map(|r| r.into_fields().into_iter().map(|(_, v)| v).collect())
                    .unwrap_or_default();
                self.combine(cells)
            })
            .collect();
        let name = merge_path.name().unwrap_or(target_name.as_str()).to_string();
        let merged = Column::with_type_inference(name, values)?;
        let out = grouped.replace_at(&merge_path, merged)?;
        if merge_path == target {
            return Ok(out);
        }

        let cleared = remove_impl(&out, &ColumnSet::from(&target), true)?.df;
        MoveClause::new(&cleared, merge_path).into(|_| target.clone())
    }

    fn combine(&self, mut cells: Vec<Value>) -> Value {
        if self.not_null {
            cells.retain(|v| match v {
                Value::Null => false,
                Value::Row(row) => !row.fields().iter().all(|(_, v)| v.is_null()),
                _ => true,
            });
        }
        (self.transform)(&cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulon_core::testing::{frame, int_col, opt_string_col, string_col, FrameAssertions, FrameFixture};

    #[test]
    fn test_merge_into_list() {
        let df = FrameFixture::people();
        let out = MergeClause::new(&df, ["name", "city"]).into("who").unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["who", "age"])
            .assert_values(
                &ColumnPath::from("who"),
                &[
                    Value::List(vec![Value::from("Alice"), Value::from("London")]),
                    Value::List(vec![Value::from("Bob"), Value::from("Dubai")]),
                    Value::List(vec![Value::from("Charlie"), Value::from("Moscow")]),
                ],
            );
    }

    #[test]
    fn test_merge_by_separator_not_null() {
        let df = frame(vec![
            string_col("first", &["a", "b"]),
            opt_string_col("middle", &[None, Some("m")]),
            string_col("last", &["z", "y"]),
        ]);
        let out = MergeClause::new(&df, ["first", "middle", "last"])
            .not_null()
            .by(" ")
            .into("full")
            .unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["full"])
            .assert_values(
                &ColumnPath::from("full"),
                &[Value::from("a z"), Value::from("b m y")],
            );
    }

    #[test]
    fn test_merge_into_existing_column_replaces_it() {
        let df = frame(vec![
            int_col("a", &[1, 2]),
            int_col("b", &[10, 20]),
            int_col("sum", &[0, 0]),
        ]);
        let out = MergeClause::new(&df, ["a", "b"])
            .with(|values| {
                Value::Int64(values.iter().filter_map(Value::as_int64).sum())
            })
            .into("sum")
            .unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["sum"])
            .assert_values(&ColumnPath::from("sum"), &[Value::Int64(11), Value::Int64(22)]);

        let out = MergeClause::new(&df, ["a", "b"]).by("+").into("a").unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["a", "sum"])
            .assert_values(&ColumnPath::from("a"), &[Value::from("1+10"), Value::from("2+20")]);
    }

    #[test]
    fn test_into_list_leaves_table_alone() {
        let df = FrameFixture::pair();
        let merged = MergeClause::new(&df, ["name", "age"]).by("/").into_list().unwrap();
        assert_eq!(merged, vec![Value::from("Alice/30"), Value::from("Bob/25")]);
    }
}
