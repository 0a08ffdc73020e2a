//! The removal tree.
//!
//! Removing columns records, for every level the removal touched, which
//! columns were there and at which index. Insertion reads those records back
//! to put a column "where it was" or "next to where that column is".
//!
//! The tree is an arena: nodes live in one vector and refer to each other by
//! [`NodeId`].

use tabulon_core::{Column, ColumnPath};

/// Index of a node in a [`RemovalTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What the tree knows about one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPosition {
    /// Index of the column among its siblings before removal.
    pub original_index: usize,
    /// Whether the column is absent from the residual table.
    pub was_removed: bool,
    /// The original column, when known.
    pub column: Option<Column>,
}

impl ColumnPosition {
    /// Position of a column that was detached.
    pub const fn removed(original_index: usize) -> Self {
        Self {
            original_index,
            was_removed: true,
            column: None,
        }
    }

    /// Position of a column that stays in place.
    pub fn kept(original_index: usize, column: Column) -> Self {
        Self {
            original_index,
            was_removed: false,
            column: Some(column),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    depth: usize,
    children: Vec<NodeId>,
    data: ColumnPosition,
}

/// Arena of column positions, rooted at the table itself.
#[derive(Debug, Clone)]
pub struct RemovalTree {
    nodes: Vec<Node>,
}

impl Default for RemovalTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RemovalTree {
    /// A tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: String::new(),
                parent: None,
                depth: 0,
                children: Vec::new(),
                data: ColumnPosition {
                    original_index: 0,
                    was_removed: false,
                    column: None,
                },
            }],
        }
    }

    /// The root, standing for the table. Its depth is 0.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Append a child node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>, data: ColumnPosition) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(Node {
            name: name.into(),
            parent: Some(parent),
            depth,
            children: Vec::new(),
            data,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Column name of a node. Empty for the root.
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Distance from the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children in creation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child of `id` named `name`.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.name(c) == name)
    }

    /// Recorded position of a node.
    pub fn data(&self, id: NodeId) -> &ColumnPosition {
        &self.nodes[id.0].data
    }

    /// Mutable recorded position of a node.
    pub fn data_mut(&mut self, id: NodeId) -> &mut ColumnPosition {
        &mut self.nodes[id.0].data
    }

    /// Ancestor of `id` at `depth`, or `id` itself when it is not deeper.
    pub fn ancestor_at(&self, id: NodeId, depth: usize) -> NodeId {
        let mut current = id;
        while self.depth(current) > depth {
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Path of a node from the root.
    pub fn path_from_root(&self, id: NodeId) -> ColumnPath {
        let mut segments = Vec::with_capacity(self.depth(id));
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            segments.push(self.name(current).to_string());
            current = parent;
        }
        segments.reverse();
        ColumnPath::from(segments)
    }

    /// Node at `path`, creating each missing node along the way from
    /// `create(prefix)`.
    pub fn get_or_put<F>(&mut self, path: &ColumnPath, mut create: F) -> NodeId
    where
        F: FnMut(&ColumnPath) -> ColumnPosition,
    {
        let mut current = self.root();
        for (depth, segment) in path.segments().iter().enumerate() {
            current = match self.child(current, segment) {
                Some(existing) => existing,
                None => {
                    let data = create(&path.take(depth + 1));
                    self.add_child(current, segment.clone(), data)
                }
            };
        }
        current
    }

    /// Every removed node below the root, depth first.
    pub fn all_removed(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_removed(self.root(), &mut out);
        out
    }

    fn collect_removed(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            if self.data(child).was_removed {
                out.push(child);
            }
            self.collect_removed(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_ancestors() {
        let mut tree = RemovalTree::new();
        let root = tree.root();
        let info = tree.add_child(root, "info", ColumnPosition::removed(2));
        let city = tree.add_child(info, "city", ColumnPosition::removed(0));

        assert_eq!(tree.depth(city), 2);
        assert_eq!(tree.path_from_root(city), ColumnPath::from(["info", "city"]));
        assert_eq!(tree.ancestor_at(city, 1), info);
        assert_eq!(tree.ancestor_at(info, 3), info);
        assert_eq!(tree.child(root, "info"), Some(info));
        assert_eq!(tree.child(root, "city"), None);
        assert!(tree.path_from_root(root).is_empty());
    }

    #[test]
    fn test_get_or_put_creates_missing_levels() {
        let mut tree = RemovalTree::new();
        let mut created = Vec::new();
        let leaf = tree.get_or_put(&ColumnPath::from(["a", "b"]), |p| {
            created.push(p.to_string());
            ColumnPosition::removed(created.len())
        });
        assert_eq!(created, vec!["a", "a.b"]);
        assert_eq!(tree.len(), 3);

        let again = tree.get_or_put(&ColumnPath::from(["a", "b"]), |_| {
            panic!("existing nodes are reused")
        });
        assert_eq!(again, leaf);
    }

    #[test]
    fn test_all_removed_is_depth_first() {
        let mut tree = RemovalTree::new();
        let root = tree.root();
        let a = tree.add_child(root, "a", ColumnPosition::removed(0));
        let a_x = tree.add_child(a, "x", ColumnPosition::removed(1));
        let b = tree.add_child(root, "b", ColumnPosition::removed(3));
        let mut kept = ColumnPosition::removed(4);
        kept.was_removed = false;
        tree.add_child(root, "c", kept);

        assert_eq!(tree.all_removed(), vec![a, a_x, b]);
        assert!(!tree.is_empty());
    }
}
