//! Attaching columns to a table.

use common_error::{TabulonError, TabulonResult};
use tabulon_core::{Column, ColumnPath, DataFrame};

use crate::tree::{NodeId, RemovalTree};

/// A column headed for `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnToInsert {
    /// Target path, the last segment naming the column.
    pub path: ColumnPath,
    /// The column, named after the last segment of `path`.
    pub column: Column,
    /// Removal-tree node the column is placed relative to.
    pub reference: Option<NodeId>,
    /// Place the column before a kept reference instead of after it.
    pub before: bool,
}

impl ColumnToInsert {
    /// Insert `column` at `path`, appended to its level.
    pub fn new(path: impl Into<ColumnPath>, column: Column) -> Self {
        let path = path.into();
        let column = match path.name() {
            Some(name) if name != column.name() => column.rename(name),
            _ => column,
        };
        Self {
            path,
            column,
            reference: None,
            before: false,
        }
    }

    /// Place the column relative to `node`: where it was when the node was
    /// removed, right after it otherwise.
    #[must_use]
    pub fn with_reference(mut self, node: NodeId) -> Self {
        self.reference = Some(node);
        self
    }

    /// Place the column right before the kept column at `node`.
    #[must_use]
    pub fn with_reference_before(mut self, node: NodeId) -> Self {
        self.reference = Some(node);
        self.before = true;
        self
    }
}

/// Insert `columns` into `df`.
///
/// Missing groups along a target path are created. Within a level, a column
/// with a reference in `tree` lands next to the recorded position, adjusted
/// for the siblings removed since; a column without one is appended in
/// request order. Inserting at an existing path, or below a column that is
/// not a group, fails.
pub fn insert_impl(
    df: &DataFrame,
    columns: Vec<ColumnToInsert>,
    tree: Option<&RemovalTree>,
) -> TabulonResult<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    if let Some(bad) = columns.iter().find(|c| c.path.is_empty()) {
        return Err(TabulonError::invalid_parameter(format!(
            "cannot insert column '{}' at the empty path",
            bad.column.name()
        )));
    }

    let pending: Vec<&ColumnToInsert> = columns.iter().collect();
    let node = tree.map(RemovalTree::root);
    let out = insert_level(Some(df), &pending, tree, node, 0)?;
    log::debug!(
        "inserted {} column(s), {} top-level column(s) now",
        columns.len(),
        out.ncol()
    );
    Ok(out)
}

fn insert_level(
    df: Option<&DataFrame>,
    columns: &[&ColumnToInsert],
    tree: Option<&RemovalTree>,
    node: Option<NodeId>,
    depth: usize,
) -> TabulonResult<DataFrame> {
    let mut pending: Vec<(&str, Vec<&ColumnToInsert>)> = Vec::new();
    for &column in columns {
        let name = column.path.get(depth).ok_or_else(|| {
            TabulonError::internal(format!("path '{}' ended above depth {depth}", column.path))
        })?;
        match pending.iter_mut().find(|(n, _)| *n == name) {
            Some((_, group)) => group.push(column),
            None => pending.push((name, vec![column])),
        }
    }

    let mut new_columns: Vec<Column> = Vec::new();
    if let Some(df) = df {
        for existing in df.columns() {
            let Some(at) = pending.iter().position(|(n, _)| *n == existing.name()) else {
                new_columns.push(existing.clone());
                continue;
            };
            let (name, below) = pending.remove(at);
            if let Some(clash) = below.iter().find(|c| c.path.len() == depth + 1) {
                return Err(TabulonError::duplicate_column(format!(
                    "cannot insert column '{}': a column with this path already exists",
                    clash.path
                )));
            }
            let Column::Group(group) = existing else {
                return Err(TabulonError::type_error(format!(
                    "cannot insert columns under '{name}': it is a {} column, not a group",
                    existing.kind()
                )));
            };
            let nested = insert_level(
                Some(group.frame()),
                &below,
                tree,
                child_node(tree, node, name),
                depth + 1,
            )?;
            new_columns.push(Column::Group(group.with_frame(nested)));
        }
    }

    let mut additions: Vec<(usize, &str, Vec<&ColumnToInsert>)> = pending
        .into_iter()
        .map(|(name, below)| (insertion_index(tree, node, depth, &below), name, below))
        .collect();
    additions.sort_by_key(|(index, ..)| *index);

    let siblings = sorted_siblings(tree, node);
    let (mut k, mut removed_before, mut inserted) = (0, 0, 0);
    for (index, name, below) in additions {
        while k < siblings.len() && siblings[k].0 < index {
            if siblings[k].1 {
                removed_before += 1;
            }
            k += 1;
        }

        let column = if below.len() == 1 && below[0].path.len() == depth + 1 {
            below[0].column.clone()
        } else {
            if let Some(clash) = below.iter().find(|c| c.path.len() == depth + 1) {
                return Err(TabulonError::duplicate_column(format!(
                    "cannot insert column '{}': another column is inserted at or below this path",
                    clash.path
                )));
            }
            let nested = insert_level(None, &below, tree, child_node(tree, node, name), depth + 1)?;
            Column::new_group(name, nested)
        };

        if index == usize::MAX {
            new_columns.push(column);
        } else {
            let at = (index + inserted)
                .saturating_sub(removed_before)
                .min(new_columns.len());
            new_columns.insert(at, column);
            inserted += 1;
        }
    }

    match df {
        Some(df) => DataFrame::with_nrow(new_columns, df.nrow()),
        None => DataFrame::new(new_columns),
    }
}

fn child_node(tree: Option<&RemovalTree>, node: Option<NodeId>, name: &str) -> Option<NodeId> {
    match (tree, node) {
        (Some(tree), Some(node)) => tree.child(node, name),
        _ => None,
    }
}

/// Smallest target index among `columns` at this level; `usize::MAX`
/// appends.
fn insertion_index(
    tree: Option<&RemovalTree>,
    node: Option<NodeId>,
    depth: usize,
    columns: &[&ColumnToInsert],
) -> usize {
    let (Some(tree), Some(node)) = (tree, node) else {
        return usize::MAX;
    };
    columns
        .iter()
        .map(|c| {
            let Some(reference) = c.reference else {
                return usize::MAX;
            };
            let at_level = tree.ancestor_at(reference, depth + 1);
            if tree.parent(at_level) != Some(node) {
                return usize::MAX;
            }
            let position = tree.data(at_level);
            let place_before = c.before && at_level == reference;
            if position.was_removed || place_before {
                position.original_index
            } else {
                position.original_index + 1
            }
        })
        .min()
        .unwrap_or(usize::MAX)
}

/// `(original_index, was_removed)` of the recorded siblings at this level.
fn sorted_siblings(tree: Option<&RemovalTree>, node: Option<NodeId>) -> Vec<(usize, bool)> {
    let (Some(tree), Some(node)) = (tree, node) else {
        return Vec::new();
    };
    let mut siblings: Vec<(usize, bool)> = tree
        .children(node)
        .iter()
        .map(|&c| {
            let data = tree.data(c);
            (data.original_index, data.was_removed)
        })
        .collect();
    siblings.sort_unstable();
    siblings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remove::remove_impl;
    use crate::selector::ColumnSet;
    use tabulon_core::testing::{int_col, string_col, FrameAssertions, FrameFixture};

    fn reinsert(df: &DataFrame, set: &ColumnSet) -> DataFrame {
        let result = remove_impl(df, set, false).unwrap();
        let columns = result
            .removed
            .into_iter()
            .map(|r| ColumnToInsert::new(r.path, r.column).with_reference(r.node))
            .collect();
        insert_impl(&result.df, columns, Some(&result.tree)).unwrap()
    }

    #[test]
    fn test_reinsert_restores_positions() {
        let df = FrameFixture::nested_people();
        let set = ColumnSet::paths([
            ColumnPath::from(["info", "address", "zip"]),
            ColumnPath::from("age"),
            ColumnPath::from(["name", "first"]),
        ]);
        assert_eq!(reinsert(&df, &set), df);
    }

    #[test]
    fn test_reinsert_recreates_collapsed_groups() {
        let df = FrameFixture::nested_people();
        let set = ColumnSet::paths([
            ColumnPath::from(["info", "address", "zip"]),
            ColumnPath::from(["info", "city"]),
            ColumnPath::from(["info", "address", "street"]),
        ]);
        assert_eq!(reinsert(&df, &set), df);
    }

    #[test]
    fn test_insert_creates_missing_groups() {
        let df = FrameFixture::people();
        let out = insert_impl(
            &df,
            vec![
                ColumnToInsert::new(ColumnPath::from(["meta", "id"]), int_col("x", &[1, 2, 3])),
                ColumnToInsert::new(ColumnPath::from(["meta", "tag"]), string_col("tag", &["a", "b", "c"])),
            ],
            None,
        )
        .unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["name", "age", "city", "meta"])
            .assert_group_columns(&ColumnPath::from("meta"), &["id", "tag"])
            .assert_invariants();
    }

    #[test]
    fn test_insert_into_existing_group() {
        let df = FrameFixture::nested_people();
        let out = insert_impl(
            &df,
            vec![ColumnToInsert::new(
                ColumnPath::from(["info", "country"]),
                string_col("country", &["UK", "UAE", "RU"]),
            )],
            None,
        )
        .unwrap();
        FrameAssertions::new(&out).assert_group_columns(
            &ColumnPath::from("info"),
            &["city", "address", "country"],
        );
    }

    #[test]
    fn test_insert_conflicts() {
        let df = FrameFixture::nested_people();
        let existing = insert_impl(
            &df,
            vec![ColumnToInsert::new("age", int_col("age", &[1, 2, 3]))],
            None,
        )
        .unwrap_err();
        assert!(matches!(existing, TabulonError::DuplicateColumn(_)));

        let under_value = insert_impl(
            &df,
            vec![ColumnToInsert::new(
                ColumnPath::from(["age", "x"]),
                int_col("x", &[1, 2, 3]),
            )],
            None,
        )
        .unwrap_err();
        assert!(matches!(under_value, TabulonError::TypeError(_)));

        let wrong_length = insert_impl(
            &df,
            vec![ColumnToInsert::new("short", int_col("short", &[1]))],
            None,
        )
        .unwrap_err();
        assert!(wrong_length.is_structural_error());
    }

    #[test]
    fn test_reference_before_kept_column() {
        let df = FrameFixture::people();
        let mut result = remove_impl(&df, &ColumnSet::from("city"), false).unwrap();
        let root = result.tree.root();
        let age = result.tree.add_child(
            root,
            "age",
            crate::tree::ColumnPosition::kept(1, int_col("age", &[15, 45, 20])),
        );
        let city = result.removed.remove(0);
        let out = insert_impl(
            &result.df,
            vec![ColumnToInsert::new(city.path, city.column).with_reference_before(age)],
            Some(&result.tree),
        )
        .unwrap();
        FrameAssertions::new(&out).assert_columns(&["name", "city", "age"]);
    }
}
