//! Splitting one column into several.

use std::fmt;
use std::sync::Arc;

use common_error::TabulonResult;
use tabulon_core::{Column, ColumnNameGenerator, DataFrame, Value};

use crate::insert::{insert_impl, ColumnToInsert};
use crate::remove::remove_impl;
use crate::selector::ColumnSet;

type SplitFn = Arc<dyn Fn(&Value) -> Vec<Value> + Send + Sync>;

/// Default splitting of a cell: null gives nothing, a list its items, a
/// table its rows, a string its comma-separated trimmed parts, and any other
/// value itself.
pub fn value_to_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::List(items) => items.clone(),
        Value::Frame(df) => (0..df.nrow()).filter_map(|i| df.row(i)).map(Value::Row).collect(),
        Value::String(s) => s.split(',').map(|part| Value::from(part.trim())).collect(),
        other => vec![other.clone()],
    }
}

/// Columns selected for splitting.
#[derive(Clone)]
pub struct SplitClause<'a> {
    df: &'a DataFrame,
    columns: ColumnSet,
    transform: SplitFn,
    default: Value,
}

impl fmt::Debug for SplitClause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitClause")
            .field("columns", &self.columns)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl<'a> SplitClause<'a> {
    /// Select `columns` of `df` for splitting with [`value_to_list`].
    pub fn new(df: &'a DataFrame, columns: impl Into<ColumnSet>) -> Self {
        Self {
            df,
            columns: columns.into(),
            transform: Arc::new(value_to_list),
            default: Value::Null,
        }
    }

    /// Split each cell with `transform`.
    #[must_use]
    pub fn by<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        self.transform = Arc::new(transform);
        self
    }

    /// Split string cells on `delimiter`, trimming each part. Other cells
    /// split as in [`value_to_list`].
    #[must_use]
    pub fn by_delimiter(self, delimiter: &str) -> Self {
        let delimiter = delimiter.to_string();
        self.by(move |value| match value {
            Value::String(s) => s
                .split(delimiter.as_str())
                .map(|part| Value::from(part.trim()))
                .collect(),
            other => value_to_list(other),
        })
    }

    /// Fill for rows that produced fewer parts than others.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// Put the parts next to their source column, named by `names`.
    /// Missing names become `split1`, `split2`, ...
    pub fn into<I, S>(self, names: I) -> TabulonResult<DataFrame>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.split_impl(names.into_iter().map(Into::into).collect(), false)
    }

    /// Put the parts into a group named like the source column.
    pub fn inward<I, S>(&self, names: I) -> TabulonResult<DataFrame>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.split_impl(names.into_iter().map(Into::into).collect(), true)
    }

    fn split_impl(&self, names: Vec<String>, inward: bool) -> TabulonResult<DataFrame> {
        let nrow = self.df.nrow();
        let removal = remove_impl(self.df, &self.columns, false)?;
        let mut generator = ColumnNameGenerator::new(removal.df.column_names());

        let mut inserts = Vec::new();
        for removed in &removal.removed {
            let mut parts: Vec<Vec<Value>> = Vec::new();
            for row in 0..nrow {
                let cell = removed.column.get(row).unwrap_or(Value::Null);
                let values = (self.transform)(&cell);
                let produced = values.len();
                for (j, value) in values.into_iter().enumerate() {
                    if parts.len() <= j {
                        let mut column = Vec::with_capacity(nrow);
                        column.resize(row, self.default.clone());
                        parts.push(column);
                    }
                    parts[j].push(value);
                }
                for column in parts.iter_mut().skip(produced) {
                    column.push(self.default.clone());
                }
            }

            for (i, values) in parts.into_iter().enumerate() {
                let preferred = names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("split{}", i + 1 - names.len()));
                let name = generator.add_unique(&preferred);
                let path = if inward {
                    removed.path.child(name.as_str())
                } else {
                    removed.path.parent().child(name.as_str())
                };
                let column = Column::with_type_inference(name, values)?;
                inserts.push(ColumnToInsert::new(path, column).with_reference(removed.node));
            }
        }
        log::debug!("split {} column(s) into {}", removal.removed.len(), inserts.len());
        insert_impl(&removal.df, inserts, Some(&removal.tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulon_core::testing::{frame, opt_string_col, string_col, FrameAssertions};
    use tabulon_core::{ColumnPath, DataType};

    fn tags() -> DataFrame {
        frame(vec![
            string_col("id", &["a", "b", "c"]),
            opt_string_col("tags", &[Some("x, y"), Some("z"), None]),
            string_col("note", &["1", "2", "3"]),
        ])
    }

    #[test]
    fn test_split_into_pads_with_default() {
        let df = tags();
        let out = SplitClause::new(&df, "tags").into(["first", "second"]).unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["id", "first", "second", "note"])
            .assert_values(
                &ColumnPath::from("first"),
                &[Value::from("x"), Value::from("z"), Value::Null],
            )
            .assert_values(
                &ColumnPath::from("second"),
                &[Value::from("y"), Value::Null, Value::Null],
            );
    }

    #[test]
    fn test_missing_names_are_generated() {
        let df = tags();
        let out = SplitClause::new(&df, "tags")
            .default("-")
            .into(Vec::<String>::new())
            .unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["id", "split1", "split2", "note"])
            .assert_values(
                &ColumnPath::from("split2"),
                &[Value::from("y"), Value::from("-"), Value::from("-")],
            );
    }

    #[test]
    fn test_split_inward_and_by_transform() {
        let df = frame(vec![string_col("range", &["1-3", "4-6"])]);
        let out = SplitClause::new(&df, "range")
            .by(|v| {
                v.as_str()
                    .map(|s| {
                        s.split('-')
                            .filter_map(|p| p.parse::<i32>().ok())
                            .map(Value::Int32)
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .inward(["from", "to"])
            .unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["range"])
            .assert_group_columns(&ColumnPath::from("range"), &["from", "to"]);
        assert_eq!(
            out.column_at_path(&ColumnPath::from(["range", "to"]))
                .unwrap()
                .data_type(),
            DataType::Int32
        );
    }

    #[test]
    fn test_split_by_delimiter_and_name_clash() {
        let df = tags();
        let out = SplitClause::new(&df, "tags")
            .by_delimiter(";")
            .into(["note"])
            .unwrap();
        FrameAssertions::new(&out).assert_columns(&["id", "note_2", "note"]);
    }

    #[test]
    fn test_split_reuses_source_name() {
        let df = tags();
        let out = SplitClause::new(&df, "tags").into(["tags", "more"]).unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["id", "tags", "more", "note"])
            .assert_values(
                &ColumnPath::from("tags"),
                &[Value::from("x"), Value::from("z"), Value::Null],
            );
    }

    #[test]
    fn test_value_to_list() {
        assert!(value_to_list(&Value::Null).is_empty());
        assert_eq!(
            value_to_list(&Value::from("a , b")),
            vec![Value::from("a"), Value::from("b")]
        );
        assert_eq!(value_to_list(&Value::Int32(3)), vec![Value::Int32(3)]);
        let rows = frame(vec![string_col("k", &["p", "q"])]);
        assert_eq!(value_to_list(&Value::Frame(rows)).len(), 2);
    }
}
