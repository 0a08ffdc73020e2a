//! Detaching columns from a table.

use std::collections::HashMap;

use common_error::{TabulonError, TabulonResult};
use tabulon_core::{Column, ColumnPath, DataFrame, UnresolvedColumnsPolicy};

use crate::selector::ColumnSet;
use crate::tree::{ColumnPosition, NodeId, RemovalTree};

/// A column pulled out of its table.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedColumn {
    /// Path of the column before removal.
    pub path: ColumnPath,
    /// The column's node in the removal tree.
    pub node: NodeId,
    /// The detached column.
    pub column: Column,
}

impl RemovedColumn {
    /// Name of the detached column.
    pub fn name(&self) -> &str {
        self.column.name()
    }
}

/// Output of [`remove_impl`].
#[derive(Debug, Clone)]
pub struct RemovalResult {
    /// The residual table.
    pub df: DataFrame,
    /// Detached columns, in the order they were requested.
    pub removed: Vec<RemovedColumn>,
    /// Original positions of every column the removal touched.
    pub tree: RemovalTree,
}

/// Detach the columns selected by `columns` from `df`.
///
/// Paths are resolved under `Skip` when `allow_missing` is set and under
/// `Fail` otherwise. A group whose children are all removed disappears from
/// the residual table; its node stays in the tree, flagged as removed and
/// holding the original group. Requesting a group together with some of its
/// children removes the whole group.
pub fn remove_impl(
    df: &DataFrame,
    columns: &ColumnSet,
    allow_missing: bool,
) -> TabulonResult<RemovalResult> {
    let policy = if allow_missing {
        UnresolvedColumnsPolicy::Skip
    } else {
        UnresolvedColumnsPolicy::Fail
    };
    let paths = columns.resolve_paths(df, policy)?;
    let mut tree = RemovalTree::new();
    if paths.is_empty() {
        return Ok(RemovalResult {
            df: df.clone(),
            removed: Vec::new(),
            tree,
        });
    }

    let mut request_order: HashMap<&ColumnPath, usize> = HashMap::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        request_order.entry(path).or_insert(i);
    }

    let targets: Vec<&ColumnPath> = paths.iter().collect();
    let mut removed = Vec::new();
    let root = tree.root();
    let residual = remove_level(df, &targets, 0, root, &mut tree, &mut removed)?
        .unwrap_or_else(|| DataFrame::empty(df.nrow()));

    removed.sort_by_key(|r| request_order.get(&r.path).copied().unwrap_or(usize::MAX));
    log::debug!(
        "removed {} column(s), {} top-level column(s) left",
        removed.len(),
        residual.ncol()
    );

    Ok(RemovalResult {
        df: residual,
        removed,
        tree,
    })
}

/// Remove `targets` from one level. `None` means nothing is left.
fn remove_level(
    df: &DataFrame,
    targets: &[&ColumnPath],
    depth: usize,
    parent: NodeId,
    tree: &mut RemovalTree,
    removed: &mut Vec<RemovedColumn>,
) -> TabulonResult<Option<DataFrame>> {
    let mut by_name: HashMap<&str, Vec<&ColumnPath>> = HashMap::new();
    for path in targets {
        if let Some(segment) = path.get(depth) {
            by_name.entry(segment).or_default().push(path);
        }
    }

    let mut kept = Vec::with_capacity(df.ncol());
    for (index, column) in df.columns().iter().enumerate() {
        let Some(below) = by_name.get(column.name()) else {
            kept.push(column.clone());
            continue;
        };
        let node = tree.add_child(parent, column.name(), ColumnPosition::removed(index));

        if below.iter().all(|p| p.len() > depth + 1) {
            let Column::Group(group) = column else {
                return Err(TabulonError::internal(format!(
                    "cannot remove below '{}': it is a {} column",
                    tree.path_from_root(node),
                    column.kind()
                )));
            };
            match remove_level(group.frame(), below, depth + 1, node, tree, removed)? {
                Some(rest) => {
                    tree.data_mut(node).was_removed = false;
                    kept.push(Column::Group(group.with_frame(rest)));
                }
                None => tree.data_mut(node).column = Some(column.clone()),
            }
            continue;
        }

        tree.data_mut(node).column = Some(column.clone());
        removed.push(RemovedColumn {
            path: tree.path_from_root(node),
            node,
            column: column.clone(),
        });
    }

    if kept.is_empty() {
        return Ok(None);
    }
    DataFrame::with_nrow(kept, df.nrow()).map(Some)
}
