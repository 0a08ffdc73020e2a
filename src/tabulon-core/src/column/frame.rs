//! Frame columns: one independent nested table per row.

use std::sync::Arc;

use common_error::{TabulonError, TabulonResult};

use crate::frame::DataFrame;
use crate::types::Value;

/// A column whose cells are independent tables of any shape.
///
/// Cells are never null. A missing frame is an empty table.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    name: String,
    frames: Arc<Vec<DataFrame>>,
}

impl FrameColumn {
    /// Create a frame column from tables.
    pub fn new(name: impl Into<String>, frames: Vec<DataFrame>) -> Self {
        Self {
            name: name.into(),
            frames: Arc::new(frames),
        }
    }

    /// Create a frame column from possibly-missing tables.
    ///
    /// Fails with `NullInFrameColumn` on the first `None`.
    pub fn from_options(
        name: impl Into<String>,
        frames: Vec<Option<DataFrame>>,
    ) -> TabulonResult<Self> {
        let name = name.into();
        let frames = frames
            .into_iter()
            .map(|f| f.ok_or_else(|| TabulonError::NullInFrameColumn(name.clone())))
            .collect::<TabulonResult<Vec<_>>>()?;
        Ok(Self::new(name, frames))
    }

    /// Create a frame column from cell values.
    ///
    /// Fails with `NullInFrameColumn` on a null and `TypeError` on anything
    /// that is not a frame.
    pub fn from_values(name: impl Into<String>, values: Vec<Value>) -> TabulonResult<Self> {
        let name = name.into();
        let mut frames = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            match value {
                Value::Frame(df) => frames.push(df),
                Value::Null => return Err(TabulonError::NullInFrameColumn(name)),
                other => {
                    return Err(TabulonError::type_error(format!(
                        "column '{name}', row {i}: expected Frame, got {}",
                        other.type_name()
                    )))
                }
            }
        }
        Ok(Self::new(name, frames))
    }

    /// Split `df` into consecutive row blocks starting at `start_indices`.
    ///
    /// Block `i` spans `start_indices[i]..start_indices[i + 1]` and the last
    /// block runs to the end of `df`.
    pub fn from_start_indices(
        name: impl Into<String>,
        df: &DataFrame,
        start_indices: &[usize],
    ) -> TabulonResult<Self> {
        let mut frames = Vec::with_capacity(start_indices.len());
        for (i, &start) in start_indices.iter().enumerate() {
            let end = start_indices.get(i + 1).copied().unwrap_or(df.nrow());
            frames.push(df.slice(start..end)?);
        }
        Ok(Self::new(name, frames))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Table at row `index`.
    pub fn get(&self, index: usize) -> Option<&DataFrame> {
        self.frames.get(index)
    }

    /// All tables.
    pub fn frames(&self) -> &[DataFrame] {
        &self.frames
    }

    /// Same cells under a new name.
    #[must_use]
    pub fn rename(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Arc::clone(&self.frames),
        }
    }

    pub(crate) fn with_frames(&self, frames: Vec<DataFrame>) -> Self {
        Self::new(self.name.clone(), frames)
    }
}
