//! The table type.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use common_error::{TabulonError, TabulonResult};

use crate::column::Column;
use crate::path::{ColumnPath, ColumnWithPath, UnresolvedColumnsPolicy};
use crate::types::{DataType, Row, Value};

/// An ordered collection of equally long, uniquely named columns.
///
/// Tables are immutable. Every transform returns a new table; the column
/// list is reference counted, so clones and untouched subtrees are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Arc<Vec<Column>>,
    nrow: usize,
}

impl DataFrame {
    /// Create a table, taking the row count from the first column.
    ///
    /// Fails with `LengthMismatch` when columns differ in length and with
    /// `DuplicateColumn` when two columns share a name.
    pub fn new(columns: Vec<Column>) -> TabulonResult<Self> {
        let nrow = columns.first().map_or(0, Column::len);
        Self::with_nrow(columns, nrow)
    }

    /// Create a table with an explicit row count, which also applies when
    /// there are no columns.
    pub fn with_nrow(columns: Vec<Column>, nrow: usize) -> TabulonResult<Self> {
        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != nrow {
                return Err(TabulonError::length_mismatch(format!(
                    "column '{}' has {} rows, expected {nrow}",
                    column.name(),
                    column.len()
                )));
            }
            if !names.insert(column.name()) {
                return Err(TabulonError::duplicate_column(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }
        Ok(Self {
            columns: Arc::new(columns),
            nrow,
        })
    }

    /// A table with no columns and `nrow` rows.
    pub fn empty(nrow: usize) -> Self {
        Self {
            columns: Arc::new(Vec::new()),
            nrow,
        }
    }

    /// Top-level columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of top-level columns.
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub const fn nrow(&self) -> usize {
        self.nrow
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Top-level column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Position of a top-level column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Top-level column by name, if present.
    pub fn try_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Top-level column by name.
    pub fn column(&self, name: &str) -> TabulonResult<&Column> {
        self.try_column(name).ok_or_else(|| {
            TabulonError::column_not_found(format!(
                "column '{name}' not found among [{}]",
                self.column_names().join(", ")
            ))
        })
    }

    /// Top-level column by position.
    pub fn column_at(&self, index: usize) -> TabulonResult<&Column> {
        self.columns.get(index).ok_or_else(|| {
            TabulonError::column_not_found(format!(
                "column index {index} out of bounds for {} columns",
                self.ncol()
            ))
        })
    }

    /// Top-level column by name under `policy`.
    pub fn get_column(
        &self,
        name: &str,
        policy: UnresolvedColumnsPolicy,
    ) -> TabulonResult<Option<ColumnWithPath>> {
        self.resolve(&ColumnPath::from(name), policy)
    }

    /// Top-level column by position under `policy`. A placeholder for a
    /// missing index is named by the index.
    pub fn get_column_at(
        &self,
        index: usize,
        policy: UnresolvedColumnsPolicy,
    ) -> TabulonResult<Option<ColumnWithPath>> {
        match self.columns.get(index) {
            Some(c) => Ok(Some(ColumnWithPath::new(
                ColumnPath::from(c.name()),
                c.clone(),
            ))),
            None => policy.unresolved(
                &ColumnPath::from(index.to_string()),
                format_args!("index out of bounds for {} columns", self.ncol()),
            ),
        }
    }

    /// Resolve a path one segment at a time, descending through groups.
    ///
    /// A missing segment, or a segment left over after a value or frame
    /// column, is handled by `policy`.
    pub fn resolve(
        &self,
        path: &ColumnPath,
        policy: UnresolvedColumnsPolicy,
    ) -> TabulonResult<Option<ColumnWithPath>> {
        if path.is_empty() {
            return Err(TabulonError::invalid_parameter(
                "cannot resolve the empty column path",
            ));
        }

        let mut frame = self;
        let last = path.len() - 1;
        for (depth, segment) in path.segments().iter().enumerate() {
            let Some(column) = frame.try_column(segment) else {
                return policy.unresolved(path, format_args!("no column '{segment}' at depth {depth}"));
            };
            if depth == last {
                return Ok(Some(ColumnWithPath::new(path.clone(), column.clone())));
            }
            match column {
                Column::Group(g) => frame = g.frame(),
                Column::Value(_) | Column::Frame(_) => {
                    return policy.unresolved(
                        path,
                        format_args!("'{segment}' is a {} column, not a group", column.kind()),
                    )
                }
            }
        }
        Err(TabulonError::internal(format!("path '{path}' walked past its end")))
    }

    /// Column at `path`, failing when it does not resolve.
    pub fn column_at_path(&self, path: &ColumnPath) -> TabulonResult<&Column> {
        let mut frame = self;
        let mut found = None;
        for (depth, segment) in path.segments().iter().enumerate() {
            let column = frame.try_column(segment).ok_or_else(|| {
                TabulonError::column_not_found(format!(
                    "column '{path}' not found: no column '{segment}' at depth {depth}"
                ))
            })?;
            if depth + 1 < path.len() {
                frame = column.nested_frame().ok_or_else(|| {
                    TabulonError::column_not_found(format!(
                        "column '{path}' not found: '{segment}' is not a group"
                    ))
                })?;
            }
            found = Some(column);
        }
        found.ok_or_else(|| TabulonError::invalid_parameter("empty column path"))
    }

    /// The table at `path`: the root for the empty path, otherwise the
    /// nested table of the group at `path`.
    pub fn frame_at_path(&self, path: &ColumnPath) -> TabulonResult<&Self> {
        if path.is_empty() {
            return Ok(self);
        }
        let column = self.column_at_path(path)?;
        column.nested_frame().ok_or_else(|| {
            TabulonError::type_error(format!("column '{path}' is a {} column, not a group", column.kind()))
        })
    }

    /// Replace the top-level column `name` or append it. The column is
    /// renamed to `name`.
    pub fn set_column(&self, name: &str, column: Column) -> TabulonResult<Self> {
        let column = if column.name() == name {
            column
        } else {
            column.rename(name)
        };
        let mut columns = self.columns.to_vec();
        match self.column_index(name) {
            Some(i) => columns[i] = column,
            None => columns.push(column),
        }
        Self::with_nrow(columns, self.nrow)
    }

    /// Append a top-level column.
    pub fn add(&self, column: Column) -> TabulonResult<Self> {
        let mut columns = self.columns.to_vec();
        columns.push(column);
        Self::with_nrow(columns, self.nrow)
    }

    /// Replace the column at `path`, rebuilding its ancestors.
    pub fn replace_at(&self, path: &ColumnPath, column: Column) -> TabulonResult<Self> {
        let Some(head) = path.get(0) else {
            return Err(TabulonError::invalid_parameter("cannot replace the empty column path"));
        };
        let index = self.column_index(head).ok_or_else(|| {
            TabulonError::column_not_found(format!("column '{path}' not found"))
        })?;

        let replacement = if path.len() == 1 {
            column
        } else {
            match &self.columns[index] {
                Column::Group(g) => {
                    let nested = g.frame().replace_at(&path.drop_first(1), column)?;
                    Column::Group(g.with_frame(nested))
                }
                other => {
                    return Err(TabulonError::column_not_found(format!(
                        "column '{path}' not found: '{head}' is a {} column",
                        other.kind()
                    )))
                }
            }
        };

        let mut columns = self.columns.to_vec();
        columns[index] = replacement;
        Self::with_nrow(columns, self.nrow)
    }

    /// Cast the value column at `path`, naming the path on failure.
    pub fn cast_column(&self, path: &ColumnPath, target: &DataType) -> TabulonResult<Self> {
        let cast = self
            .column_at_path(path)?
            .cast(target)
            .map_err(|e| TabulonError::type_error(format!("at path '{path}': {e}")))?;
        self.replace_at(path, cast)
    }

    /// Row `index` as name/value pairs. Group cells nest as rows.
    pub fn row(&self, index: usize) -> Option<Row> {
        if index >= self.nrow {
            return None;
        }
        let fields = self
            .columns
            .iter()
            .map(|c| (c.name().to_string(), c.get(index).unwrap_or(Value::Null)));
        Some(Row::new(fields))
    }

    /// Rows at `indices`, across every column.
    pub fn rows(&self, indices: &[usize]) -> TabulonResult<Self> {
        if let Some(bad) = indices.iter().find(|&&i| i >= self.nrow) {
            return Err(TabulonError::invalid_parameter(format!(
                "row index {bad} out of bounds for {} rows",
                self.nrow
            )));
        }
        Ok(self.gather_rows(indices))
    }

    /// Rows `range`.
    pub fn slice(&self, range: Range<usize>) -> TabulonResult<Self> {
        if range.start > range.end || range.end > self.nrow {
            return Err(TabulonError::invalid_parameter(format!(
                "row range {}..{} out of bounds for {} rows",
                range.start, range.end, self.nrow
            )));
        }
        Ok(self.gather_rows(&range.collect::<Vec<_>>()))
    }

    /// Gather with indices already known to be in bounds.
    pub(crate) fn gather_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: Arc::new(self.columns.iter().map(|c| c.gather(indices)).collect()),
            nrow: indices.len(),
        }
    }

    /// Whether two tables share the same column list.
    pub fn shares_columns(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.columns, &other.columns)
    }
}
