//! Columns: the closed set of value, group and frame columns.
//!
//! Every operation matches exhaustively on [`Column`]. Column values are
//! immutable; operations return new columns that share untouched storage.

mod frame;
mod group;
mod value;

use std::collections::HashSet;
use std::ops::Range;

use common_error::{TabulonError, TabulonResult};
use serde::{Deserialize, Serialize};

pub use frame::FrameColumn;
pub use group::ColumnGroup;
pub use value::ValueColumn;

use crate::frame::DataFrame;
use crate::types::{coerce_value, DataType, Row, Value};

/// Kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Scalar cells.
    Value,
    /// Cells are rows of one nested table.
    Group,
    /// Cells are independent nested tables.
    Frame,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value => write!(f, "Value"),
            Self::Group => write!(f, "Group"),
            Self::Frame => write!(f, "Frame"),
        }
    }
}

/// A named, fixed-length column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Scalar cells.
    Value(ValueColumn),
    /// Rows of a nested table.
    Group(ColumnGroup),
    /// Independent nested tables.
    Frame(FrameColumn),
}

impl Column {
    /// Create a value column with a declared type.
    pub fn new_value(
        name: impl Into<String>,
        values: Vec<Value>,
        data_type: DataType,
    ) -> TabulonResult<Self> {
        ValueColumn::new(name, values, data_type).map(Self::Value)
    }

    /// Wrap a table as a group column.
    pub fn new_group(name: impl Into<String>, frame: DataFrame) -> Self {
        Self::Group(ColumnGroup::new(name, frame))
    }

    /// Create a frame column.
    pub fn new_frame(name: impl Into<String>, frames: Vec<DataFrame>) -> Self {
        Self::Frame(FrameColumn::new(name, frames))
    }

    /// Create a column from untyped cells, choosing its kind and type.
    ///
    /// - every non-null cell a row: a group column whose fields are the union
    ///   of the row fields in first-seen order (missing fields are null);
    /// - every non-null cell a frame: a frame column where nulls become empty
    ///   tables;
    /// - otherwise a value column typed by [`crate::types::guess_type`].
    pub fn with_type_inference(name: impl Into<String>, values: Vec<Value>) -> TabulonResult<Self> {
        let name = name.into();
        let mut non_null = values.iter().filter(|v| !v.is_null()).peekable();
        if non_null.peek().is_none() {
            return Ok(Self::Value(ValueColumn::infer(name, values)));
        }

        let (mut all_rows, mut all_frames) = (true, true);
        for value in non_null {
            all_rows &= matches!(value, Value::Row(_));
            all_frames &= matches!(value, Value::Frame(_));
        }

        if all_rows {
            let nrow = values.len();
            let frame = rows_to_frame(values)?.unwrap_or_else(|| DataFrame::empty(nrow));
            return Ok(Self::new_group(name, frame));
        }
        if all_frames {
            let frames = values
                .into_iter()
                .map(|v| match v {
                    Value::Frame(df) => df,
                    _ => DataFrame::empty(0),
                })
                .collect();
            return Ok(Self::new_frame(name, frames));
        }
        Ok(Self::Value(ValueColumn::infer(name, values)))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        match self {
            Self::Value(c) => c.name(),
            Self::Group(c) => c.name(),
            Self::Frame(c) => c.name(),
        }
    }

    /// Column kind.
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Value(_) => ColumnKind::Value,
            Self::Group(_) => ColumnKind::Group,
            Self::Frame(_) => ColumnKind::Frame,
        }
    }

    /// Type of a cell: the value type, `Row` or `Frame`.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Value(c) => c.data_type().clone(),
            Self::Group(_) => DataType::Row,
            Self::Frame(_) => DataType::Frame,
        }
    }

    /// Whether cells may be null. Group and frame cells never are.
    pub const fn is_nullable(&self) -> bool {
        match self {
            Self::Value(c) => c.is_nullable(),
            Self::Group(_) | Self::Frame(_) => false,
        }
    }

    /// Whether any cell is null.
    pub fn has_nulls(&self) -> bool {
        match self {
            Self::Value(c) => c.iter().any(Value::is_null),
            Self::Group(_) | Self::Frame(_) => false,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Value(c) => c.len(),
            Self::Group(c) => c.len(),
            Self::Frame(c) => c.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `index`. Group cells are materialized as rows.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Self::Value(c) => c.get(index).cloned(),
            Self::Group(c) => c.get(index).map(Value::Row),
            Self::Frame(c) => c.get(index).cloned().map(Value::Frame),
        }
    }

    /// All cells, materialized.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Self::Value(c) => c.values().to_vec(),
            Self::Group(c) => (0..c.len()).filter_map(|i| c.get(i)).map(Value::Row).collect(),
            Self::Frame(c) => c.frames().iter().cloned().map(Value::Frame).collect(),
        }
    }

    /// Same cells under a new name.
    #[must_use]
    pub fn rename(&self, name: impl Into<String>) -> Self {
        match self {
            Self::Value(c) => Self::Value(c.rename(name)),
            Self::Group(c) => Self::Group(c.rename(name)),
            Self::Frame(c) => Self::Frame(c.rename(name)),
        }
    }

    /// Rows `range`, keeping kind and type.
    pub fn slice(&self, range: Range<usize>) -> TabulonResult<Self> {
        if range.start > range.end || range.end > self.len() {
            return Err(TabulonError::invalid_parameter(format!(
                "range {}..{} out of bounds for column '{}' of length {}",
                range.start,
                range.end,
                self.name(),
                self.len()
            )));
        }
        Ok(self.gather(&range.collect::<Vec<_>>()))
    }

    /// Rows at `indices`, in that order. Indices may repeat.
    pub fn take(&self, indices: &[usize]) -> TabulonResult<Self> {
        if let Some(bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(TabulonError::invalid_parameter(format!(
                "index {bad} out of bounds for column '{}' of length {}",
                self.name(),
                self.len()
            )));
        }
        Ok(self.gather(indices))
    }

    /// Gather with indices already known to be in bounds.
    pub(crate) fn gather(&self, indices: &[usize]) -> Self {
        match self {
            Self::Value(c) => {
                let values = indices.iter().filter_map(|&i| c.get(i).cloned()).collect();
                Self::Value(c.with_values(values))
            }
            Self::Group(c) => Self::Group(c.with_frame(c.frame().gather_rows(indices))),
            Self::Frame(c) => {
                let frames = indices.iter().filter_map(|&i| c.get(i).cloned()).collect();
                Self::Frame(c.with_frames(frames))
            }
        }
    }

    /// Drop repeated cells, keeping first occurrences in order.
    ///
    /// Group cells compare as rows and frame cells structurally.
    #[must_use]
    pub fn distinct(&self) -> Self {
        let mut seen = HashSet::new();
        let indices: Vec<usize> = self
            .values()
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| seen.insert(v).then_some(i))
            .collect();
        if indices.len() == self.len() {
            return self.clone();
        }
        self.gather(&indices)
    }

    /// Transform every cell, inferring kind and type of the result.
    pub fn map<F>(&self, f: F) -> TabulonResult<Self>
    where
        F: FnMut(Value) -> Value,
    {
        let values = self.values().into_iter().map(f).collect();
        Self::with_type_inference(self.name(), values)
    }

    /// Transform every cell into a value column of the given type.
    pub fn map_typed<F>(&self, data_type: DataType, f: F) -> TabulonResult<Self>
    where
        F: FnMut(Value) -> Value,
    {
        let values = self.values().into_iter().map(f).collect();
        Self::new_value(self.name(), values, data_type)
    }

    /// Convert a value column to `target`.
    ///
    /// Fails with a `TypeError` naming the column, source and target types
    /// when the types are incompatible or a cell does not convert.
    pub fn cast(&self, target: &DataType) -> TabulonResult<Self> {
        let source = self.data_type();
        if &source == target {
            return Ok(self.clone());
        }
        let Self::Value(c) = self else {
            return Err(TabulonError::type_error(format!(
                "cannot cast {} column '{}' of type {source} to {target}",
                self.kind(),
                self.name()
            )));
        };
        if !source.can_coerce_to(target) {
            return Err(TabulonError::type_error(format!(
                "cannot cast column '{}' of type {source} to {target}",
                c.name()
            )));
        }
        let values = c
            .iter()
            .map(|v| coerce_value(v, target))
            .collect::<TabulonResult<Vec<_>>>()
            .map_err(|e| TabulonError::type_error(format!("column '{}': {e}", c.name())))?;
        Ok(Self::Value(ValueColumn::from_checked(
            c.name().to_string(),
            values,
            target.clone(),
        )))
    }

    /// Borrow as a value column.
    pub const fn as_value(&self) -> Option<&ValueColumn> {
        match self {
            Self::Value(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as a group column.
    pub const fn as_group(&self) -> Option<&ColumnGroup> {
        match self {
            Self::Group(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as a frame column.
    pub const fn as_frame(&self) -> Option<&FrameColumn> {
        match self {
            Self::Frame(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this is a group column.
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// The nested table of a group column.
    pub const fn nested_frame(&self) -> Option<&DataFrame> {
        match self {
            Self::Group(c) => Some(c.frame()),
            _ => None,
        }
    }

    /// The table in row `index` of a frame column.
    pub fn frame_at(&self, index: usize) -> Option<&DataFrame> {
        match self {
            Self::Frame(c) => c.get(index),
            _ => None,
        }
    }
}

/// Build the nested table of a group column from row cells.
///
/// Returns `None` when no row has any field.
fn rows_to_frame(values: Vec<Value>) -> TabulonResult<Option<DataFrame>> {
    let nrow = values.len();
    let rows: Vec<Option<Row>> = values
        .into_iter()
        .map(|v| match v {
            Value::Row(r) => Some(r),
            _ => None,
        })
        .collect();

    let mut names: Vec<String> = Vec::new();
    for row in rows.iter().flatten() {
        for name in row.names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    if names.is_empty() {
        return Ok(None);
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells = rows
                .iter()
                .map(|r| r.as_ref().and_then(|r| r.get(name)).cloned().unwrap_or(Value::Null))
                .collect();
            Column::with_type_inference(name.clone(), cells)
        })
        .collect::<TabulonResult<Vec<_>>>()?;
    DataFrame::with_nrow(columns, nrow).map(Some)
}

impl From<ValueColumn> for Column {
    fn from(c: ValueColumn) -> Self {
        Self::Value(c)
    }
}

impl From<ColumnGroup> for Column {
    fn from(c: ColumnGroup) -> Self {
        Self::Group(c)
    }
}

impl From<FrameColumn> for Column {
    fn from(c: FrameColumn) -> Self {
        Self::Frame(c)
    }
}
