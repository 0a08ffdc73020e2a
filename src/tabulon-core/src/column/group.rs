//! Group columns: a named nested table aligned row-for-row with its parent.

use crate::frame::DataFrame;
use crate::types::Row;

/// A column whose cell at row `i` is row `i` of a nested table.
///
/// The nested table's row count is the column's length, so a parent table
/// checking column lengths also checks the alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    name: String,
    frame: DataFrame,
}

impl ColumnGroup {
    /// Wrap a table as a group column.
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The nested table.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume into the nested table.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub const fn len(&self) -> usize {
        self.frame.nrow()
    }

    /// Whether the group has no rows.
    pub const fn is_empty(&self) -> bool {
        self.frame.nrow() == 0
    }

    /// Row `index` of the nested table.
    pub fn get(&self, index: usize) -> Option<Row> {
        self.frame.row(index)
    }

    /// Same nested table under a new name.
    #[must_use]
    pub fn rename(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.frame.clone())
    }

    /// Same name, different nested table.
    #[must_use]
    pub fn with_frame(&self, frame: DataFrame) -> Self {
        Self::new(self.name.clone(), frame)
    }
}
