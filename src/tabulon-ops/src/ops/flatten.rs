//! Flattening nested groups.

use std::collections::HashMap;

use common_error::{TabulonError, TabulonResult};
use tabulon_core::{ColumnNameGenerator, ColumnPath, DataFrame, UnresolvedColumnsPolicy};

use crate::insert::{insert_impl, ColumnToInsert};
use crate::remove::remove_impl;
use crate::selector::ColumnSet;

/// Replace the outermost selected groups by their leaves.
///
/// Leaves land in the parent of their outermost group, where that group
/// was. Names are made unique per parent with a [`ColumnNameGenerator`]
/// seeded with the parent's remaining columns. With `keep_parent_name` a
/// leaf is named `name.parent` after its direct parent group.
pub(crate) fn flatten_impl(
    df: &DataFrame,
    columns: &ColumnSet,
    keep_parent_name: bool,
) -> TabulonResult<DataFrame> {
    let roots = columns
        .clone()
        .filter(|c| c.is_group())
        .top()
        .resolve_paths(df, UnresolvedColumnsPolicy::Fail)?;
    if roots.is_empty() {
        return Ok(df.clone());
    }

    let mut generators: HashMap<ColumnPath, ColumnNameGenerator> = HashMap::new();
    let mut leaves = Vec::new();
    for root in &roots {
        let parent = root.parent();
        if !generators.contains_key(&parent) {
            let siblings = df.frame_at_path(&parent)?;
            let used = siblings
                .columns()
                .iter()
                .map(|c| c.name())
                .filter(|name| !roots.contains(&parent.child(*name)));
            let generator = ColumnNameGenerator::new(used);
            generators.insert(parent, generator);
        }
        collect_leaves(df.frame_at_path(root)?, root, &mut leaves);
    }

    let removal = remove_impl(df, &ColumnSet::Paths(leaves), false)?;
    let mut inserts = Vec::with_capacity(removal.removed.len());
    for removed in removal.removed {
        let root = roots
            .iter()
            .find(|root| removed.path.starts_with(root))
            .ok_or_else(|| {
                TabulonError::internal(format!("'{}' is not under a flattened group", removed.path))
            })?;
        let parent = root.parent();
        let name = match removed.path.len() {
            n if keep_parent_name && n >= 2 => {
                format!("{}.{}", removed.name(), removed.path.segments()[n - 2])
            }
            _ => removed.name().to_string(),
        };
        let unique = generators
            .get_mut(&parent)
            .map(|g| g.add_unique(&name))
            .ok_or_else(|| TabulonError::internal(format!("no name generator for '{parent}'")))?;
        inserts.push(
            ColumnToInsert::new(parent.child(unique), removed.column).with_reference(removed.node),
        );
    }
    insert_impl(&removal.df, inserts, Some(&removal.tree))
}

/// Non-group descendants of `frame`, plus groups without columns.
fn collect_leaves(frame: &DataFrame, prefix: &ColumnPath, out: &mut Vec<ColumnPath>) {
    for column in frame.columns() {
        let path = prefix.child(column.name());
        match column.nested_frame() {
            Some(nested) if !nested.is_empty() => collect_leaves(nested, &path, out),
            _ => out.push(path),
        }
    }
}
