//! Testing utilities and helpers for tabulon-core.
//!
//! Fixture tables and assertion helpers shared by the tests of every
//! tabulon crate. Enabled by the `testing` feature.

use std::collections::HashSet;

use crate::column::Column;
use crate::frame::DataFrame;
use crate::path::ColumnPath;
use crate::types::{DataType, Value};

/// A string value column.
pub fn string_col(name: &str, values: &[&str]) -> Column {
    opt_string_col(name, &values.iter().map(|v| Some(*v)).collect::<Vec<_>>())
}

/// A string value column with nulls.
pub fn opt_string_col(name: &str, values: &[Option<&str>]) -> Column {
    Column::new_value(
        name,
        values.iter().map(|v| Value::from(*v)).collect(),
        DataType::String,
    )
    .unwrap()
}

/// An `Int32` value column.
pub fn int_col(name: &str, values: &[i32]) -> Column {
    Column::new_value(
        name,
        values.iter().copied().map(Value::Int32).collect(),
        DataType::Int32,
    )
    .unwrap()
}

/// A table from columns.
pub fn frame(columns: Vec<Column>) -> DataFrame {
    DataFrame::new(columns).unwrap()
}

/// A group column from columns.
pub fn group(name: &str, columns: Vec<Column>) -> Column {
    Column::new_group(name, frame(columns))
}

/// Named fixture tables.
pub struct FrameFixture;

impl FrameFixture {
    /// `name`, `age`, `city`: three people.
    pub fn people() -> DataFrame {
        frame(vec![
            string_col("name", &["Alice", "Bob", "Charlie"]),
            int_col("age", &[15, 45, 20]),
            string_col("city", &["London", "Dubai", "Moscow"]),
        ])
    }

    /// `name`, `age` as in scenario tables with two rows.
    pub fn pair() -> DataFrame {
        frame(vec![
            string_col("name", &["Alice", "Bob"]),
            int_col("age", &[30, 25]),
        ])
    }

    /// `name { first, last }`, `age`, `info { city, address { street, zip } }`.
    pub fn nested_people() -> DataFrame {
        frame(vec![
            group(
                "name",
                vec![
                    string_col("first", &["Alice", "Bob", "Charlie"]),
                    string_col("last", &["Cooper", "Dylan", "Daniels"]),
                ],
            ),
            int_col("age", &[15, 45, 20]),
            group(
                "info",
                vec![
                    opt_string_col("city", &[Some("London"), Some("Dubai"), None]),
                    group(
                        "address",
                        vec![
                            string_col("street", &["Baker", "Palm", "Arbat"]),
                            int_col("zip", &[1, 2, 3]),
                        ],
                    ),
                ],
            ),
        ])
    }

    /// `city`, `visits`: one frame cell per city.
    pub fn with_frames() -> DataFrame {
        frame(vec![
            string_col("city", &["London", "Dubai"]),
            Column::new_frame(
                "visits",
                vec![
                    frame(vec![int_col("year", &[2020, 2021])]),
                    DataFrame::empty(0),
                ],
            ),
        ])
    }
}

/// Assertion helpers for tables.
pub struct FrameAssertions<'a> {
    df: &'a DataFrame,
}

impl<'a> FrameAssertions<'a> {
    /// Create new assertions for a table.
    pub const fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    /// Assert the top-level column names.
    pub fn assert_columns(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.df.column_names(),
            expected,
            "Unexpected top-level columns"
        );
        self
    }

    /// Assert the names of the columns of the group at `path`.
    pub fn assert_group_columns(self, path: &ColumnPath, expected: &[&str]) -> Self {
        let nested = self
            .df
            .frame_at_path(path)
            .unwrap_or_else(|e| panic!("Expected group at '{path}': {e}"));
        assert_eq!(nested.column_names(), expected, "Unexpected columns in '{path}'");
        self
    }

    /// Assert the row count.
    pub fn assert_nrow(self, expected: usize) -> Self {
        assert_eq!(
            self.df.nrow(),
            expected,
            "Expected {} rows, found {}",
            expected,
            self.df.nrow()
        );
        self
    }

    /// Assert the cells of the column at `path`.
    pub fn assert_values(self, path: &ColumnPath, expected: &[Value]) -> Self {
        let column = self
            .df
            .column_at_path(path)
            .unwrap_or_else(|e| panic!("Expected column at '{path}': {e}"));
        assert_eq!(column.values(), expected, "Unexpected values in '{path}'");
        self
    }

    /// Assert that every level has equally long, uniquely named columns.
    pub fn assert_invariants(self) -> Self {
        check_level(self.df, &ColumnPath::root());
        self
    }
}

fn check_level(df: &DataFrame, at: &ColumnPath) {
    let mut seen = HashSet::new();
    for column in df.columns() {
        assert_eq!(
            column.len(),
            df.nrow(),
            "Column '{}' under '{at}' has the wrong length",
            column.name()
        );
        assert!(
            seen.insert(column.name()),
            "Duplicate column '{}' under '{at}'",
            column.name()
        );
        if let Some(nested) = column.nested_frame() {
            check_level(nested, &at.child(column.name()));
        }
    }
}
