//! Read-only structural summary of a table's column tree.

use std::fmt;

use common_display::{DisplayTree, TreeNode};
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnKind};
use crate::frame::DataFrame;
use crate::path::ColumnPath;
use crate::types::DataType;

/// Description of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Column kind.
    pub kind: ColumnKind,
    /// Cell type.
    pub data_type: DataType,
    /// Whether cells may be null.
    pub nullable: bool,
    /// Nested columns of a group, or the columns shared by every non-empty
    /// table of a frame column.
    pub children: Vec<ColumnSchema>,
}

impl ColumnSchema {
    fn of(column: &Column) -> Self {
        let children = match column {
            Column::Value(_) => Vec::new(),
            Column::Group(g) => FrameSchema::of(g.frame()).columns,
            Column::Frame(f) => intersect(f.frames().iter().filter(|df| !df.is_empty())),
        };
        Self {
            name: column.name().to_string(),
            kind: column.kind(),
            data_type: column.data_type(),
            nullable: column.is_nullable(),
            children,
        }
    }
}

/// Schema of a table: its column tree without data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSchema {
    /// Top-level columns in order.
    pub columns: Vec<ColumnSchema>,
}

impl FrameSchema {
    /// Project the column tree of `df`.
    pub fn of(df: &DataFrame) -> Self {
        Self {
            columns: df.columns().iter().map(ColumnSchema::of).collect(),
        }
    }

    /// Description of the column at `path`, following group children.
    pub fn column(&self, path: &ColumnPath) -> Option<&ColumnSchema> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.columns.iter().find(|c| &c.name == first)?;
        for segment in rest {
            if current.kind != ColumnKind::Group {
                return None;
            }
            current = current.children.iter().find(|c| &c.name == segment)?;
        }
        Some(current)
    }

    /// Paths of all value and frame columns, depth first.
    pub fn leaf_paths(&self) -> Vec<ColumnPath> {
        fn walk(columns: &[ColumnSchema], prefix: &ColumnPath, out: &mut Vec<ColumnPath>) {
            for c in columns {
                let path = prefix.child(c.name.clone());
                if c.kind == ColumnKind::Group {
                    walk(&c.children, &path, out);
                } else {
                    out.push(path);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.columns, &ColumnPath::root(), &mut out);
        out
    }
}

/// Columns present, by name, in every table; described as in the first.
fn intersect<'a, I>(frames: I) -> Vec<ColumnSchema>
where
    I: IntoIterator<Item = &'a DataFrame>,
{
    let mut frames = frames.into_iter();
    let Some(first) = frames.next() else {
        return Vec::new();
    };
    let rest: Vec<&DataFrame> = frames.collect();
    first
        .columns()
        .iter()
        .filter(|c| rest.iter().all(|df| df.try_column(c.name()).is_some()))
        .map(ColumnSchema::of)
        .collect()
}

impl TreeNode for ColumnSchema {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.children.iter().map(|c| c as &dyn TreeNode).collect()
    }

    fn details(&self) -> Option<String> {
        Some(match self.kind {
            ColumnKind::Value if self.nullable => format!("{}?", self.data_type),
            ColumnKind::Value => self.data_type.to_string(),
            ColumnKind::Group => "Group".to_string(),
            ColumnKind::Frame => "Frame".to_string(),
        })
    }
}

impl TreeNode for FrameSchema {
    fn label(&self) -> String {
        "DataFrame".to_string()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.columns.iter().map(|c| c as &dyn TreeNode).collect()
    }
}

impl fmt::Display for FrameSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DisplayTree::new(self))
    }
}

impl DataFrame {
    /// Structural summary of this table.
    pub fn schema(&self) -> FrameSchema {
        FrameSchema::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn sample() -> DataFrame {
        let info = DataFrame::new(vec![Column::new_value(
            "age",
            vec![Value::Int32(30), Value::Null],
            DataType::Int32,
        )
        .unwrap()])
        .unwrap();
        let inner = DataFrame::new(vec![Column::new_value(
            "x",
            vec![Value::from("a")],
            DataType::String,
        )
        .unwrap()])
        .unwrap();
        DataFrame::new(vec![
            Column::new_value("name", vec!["A".into(), "B".into()], DataType::String).unwrap(),
            Column::new_group("info", info),
            Column::new_frame("items", vec![inner, DataFrame::empty(0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_projection() {
        let schema = sample().schema();
        assert_eq!(schema.columns.len(), 3);

        let age = schema.column(&ColumnPath::from(["info", "age"])).unwrap();
        assert_eq!(age.data_type, DataType::Int32);
        assert!(age.nullable);

        let items = schema.column(&ColumnPath::from("items")).unwrap();
        assert_eq!(items.kind, ColumnKind::Frame);
        assert_eq!(items.children[0].name, "x");

        assert!(schema.column(&ColumnPath::from(["name", "x"])).is_none());
        assert_eq!(
            schema.leaf_paths(),
            vec![
                ColumnPath::from("name"),
                ColumnPath::from(["info", "age"]),
                ColumnPath::from("items"),
            ]
        );
    }

    #[test]
    fn test_display() {
        let rendered = sample().schema().to_string();
        assert_eq!(
            rendered,
            "DataFrame\n├─ name (String)\n├─ info (Group)\n│  └─ age (Int32?)\n└─ items (Frame)\n   └─ x (String)\n"
        );
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_string(&sample().schema()).unwrap();
        assert!(json.contains("\"kind\":\"Group\""));
    }
}
