//! Tree display for nested column schemas.

use std::fmt;

/// A node in a display tree.
pub trait TreeNode {
    /// Label printed for this node.
    fn label(&self) -> String;

    /// Child nodes, in display order.
    fn children(&self) -> Vec<&dyn TreeNode>;

    /// Extra text printed in parentheses after the label.
    fn details(&self) -> Option<String> {
        None
    }
}

/// Renders a [`TreeNode`] hierarchy with box-drawing connectors.
///
/// ```text
/// root
/// ├─ name (String)
/// └─ info (Group)
///    └─ age (Int32)
/// ```
pub struct DisplayTree<'a> {
    root: &'a dyn TreeNode,
    max_depth: Option<usize>,
}

impl fmt::Debug for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayTree")
            .field("root", &self.root.label())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<'a> DisplayTree<'a> {
    /// Create a new display tree.
    pub fn new(root: &'a dyn TreeNode) -> Self {
        Self {
            root,
            max_depth: None,
        }
    }

    /// Stop descending below `depth` levels under the root.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &dyn TreeNode,
        prefix: &str,
        is_last: bool,
        depth: usize,
    ) -> fmt::Result {
        let connector = if is_last { "└─ " } else { "├─ " };

        write!(f, "{prefix}{connector}{}", node.label())?;
        if let Some(details) = node.details() {
            write!(f, " ({details})")?;
        }
        writeln!(f)?;

        if self.max_depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }

        let children = node.children();
        let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
        for (i, child) in children.iter().enumerate() {
            let is_last_child = i + 1 == children.len();
            self.fmt_node(f, *child, &child_prefix, is_last_child, depth + 1)?;
        }

        Ok(())
    }
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.label())?;
        if let Some(details) = self.root.details() {
            write!(f, " ({details})")?;
        }
        writeln!(f)?;

        let children = self.root.children();
        for (i, child) in children.iter().enumerate() {
            let is_last = i + 1 == children.len();
            self.fmt_node(f, *child, "", is_last, 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestNode {
        name: &'static str,
        children: Vec<TestNode>,
    }

    impl TreeNode for TestNode {
        fn label(&self) -> String {
            self.name.to_string()
        }

        fn children(&self) -> Vec<&dyn TreeNode> {
            self.children.iter().map(|c| c as &dyn TreeNode).collect()
        }
    }

    fn leaf(name: &'static str) -> TestNode {
        TestNode {
            name,
            children: vec![],
        }
    }

    fn sample() -> TestNode {
        TestNode {
            name: "root",
            children: vec![
                leaf("name"),
                TestNode {
                    name: "info",
                    children: vec![leaf("age")],
                },
            ],
        }
    }

    #[test]
    fn test_display_tree() {
        let output = DisplayTree::new(&sample()).to_string();
        assert_eq!(output, "root\n├─ name\n└─ info\n   └─ age\n");
    }

    #[test]
    fn test_max_depth() {
        let tree = sample();
        let output = DisplayTree::new(&tree).with_max_depth(1).to_string();
        assert!(output.contains("info"));
        assert!(!output.contains("age"));
    }
}
