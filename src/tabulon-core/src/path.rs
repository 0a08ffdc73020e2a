//! Column paths and the policy applied when a path does not resolve.

use std::fmt;

use common_error::{TabulonError, TabulonResult};
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnKind};

/// Ordered name segments addressing a column through nested group columns.
///
/// Equality is segment-wise. Names may themselves contain dots, so
/// `ColumnPath::from("a.b")` is the single segment `a.b`; use
/// [`ColumnPath::parse`] to split a dotted string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    /// Create a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The empty path, addressing the root table.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Split a dotted string into segments.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    /// The segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segment at `depth`.
    pub fn get(&self, depth: usize) -> Option<&str> {
        self.0.get(depth).map(String::as_str)
    }

    /// Last segment: the name of the addressed column.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of the enclosing group (`drop_last(1)`).
    #[must_use]
    pub fn parent(&self) -> Self {
        self.drop_last(1)
    }

    /// Drop `n` trailing segments.
    #[must_use]
    pub fn drop_last(&self, n: usize) -> Self {
        let keep = self.0.len().saturating_sub(n);
        Self(self.0[..keep].to_vec())
    }

    /// Drop `n` leading segments.
    #[must_use]
    pub fn drop_first(&self, n: usize) -> Self {
        let skip = n.min(self.0.len());
        Self(self.0[skip..].to_vec())
    }

    /// Keep the first `n` segments.
    #[must_use]
    pub fn take(&self, n: usize) -> Self {
        let keep = n.min(self.0.len());
        Self(self.0[..keep].to_vec())
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Append every segment of `other`.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// Remove the segment at `index`.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        if index < segments.len() {
            segments.remove(index);
        }
        Self(segments)
    }

    /// Replace the last segment.
    #[must_use]
    pub fn rename(&self, name: impl Into<String>) -> Self {
        self.parent().child(name)
    }

    /// Whether `prefix` is a (non-strict) prefix of this path.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for ColumnPath {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ColumnPath {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<const N: usize> From<[&str; N]> for ColumnPath {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl From<&ColumnPath> for ColumnPath {
    fn from(path: &ColumnPath) -> Self {
        path.clone()
    }
}

/// What a tree walk does when a name or path does not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnresolvedColumnsPolicy {
    /// Raise `ColumnNotFound`.
    #[default]
    Fail,
    /// Yield nothing; the caller filters the path out.
    Skip,
    /// Yield a placeholder that raises `UnresolvedPlaceholder` when read.
    Create,
}

impl UnresolvedColumnsPolicy {
    /// Apply this policy to an unresolved `path`.
    pub fn unresolved(
        self,
        path: &ColumnPath,
        reason: impl fmt::Display,
    ) -> TabulonResult<Option<ColumnWithPath>> {
        match self {
            Self::Fail => Err(TabulonError::column_not_found(format!(
                "column '{path}' not found: {reason}"
            ))),
            Self::Skip => Ok(None),
            Self::Create => Ok(Some(ColumnWithPath::placeholder(path.clone()))),
        }
    }
}

/// A resolved column together with its full path from the root.
///
/// A placeholder produced under [`UnresolvedColumnsPolicy::Create`] carries a
/// path but no column; every accessor that reads data fails on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWithPath {
    path: ColumnPath,
    column: Option<Column>,
}

impl ColumnWithPath {
    /// Pair a column with its path.
    pub const fn new(path: ColumnPath, column: Column) -> Self {
        Self {
            path,
            column: Some(column),
        }
    }

    /// A placeholder for a path that did not resolve.
    pub const fn placeholder(path: ColumnPath) -> Self {
        Self { path, column: None }
    }

    /// Full path from the root.
    pub const fn path(&self) -> &ColumnPath {
        &self.path
    }

    /// Name of the column, taken from the path so placeholders have one too.
    pub fn name(&self) -> &str {
        self.path.name().unwrap_or_default()
    }

    /// Whether this is a placeholder.
    pub const fn is_placeholder(&self) -> bool {
        self.column.is_none()
    }

    /// The column, or `UnresolvedPlaceholder` for a placeholder.
    pub fn column(&self) -> TabulonResult<&Column> {
        self.column
            .as_ref()
            .ok_or_else(|| TabulonError::UnresolvedPlaceholder(self.path.to_string()))
    }

    /// Consume into the column, or `UnresolvedPlaceholder` for a placeholder.
    pub fn into_column(self) -> TabulonResult<Column> {
        self.column
            .ok_or(TabulonError::UnresolvedPlaceholder(self.path.to_string()))
    }

    /// Split into path and column.
    pub fn into_parts(self) -> TabulonResult<(ColumnPath, Column)> {
        match self.column {
            Some(column) => Ok((self.path, column)),
            None => Err(TabulonError::UnresolvedPlaceholder(self.path.to_string())),
        }
    }

    /// Kind of the column. Placeholders have no kind.
    pub fn kind(&self) -> Option<ColumnKind> {
        self.column.as_ref().map(Column::kind)
    }

    /// Whether this is a resolved group column.
    pub fn is_group(&self) -> bool {
        self.kind() == Some(ColumnKind::Group)
    }
}
