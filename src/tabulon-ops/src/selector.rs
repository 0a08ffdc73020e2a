//! Column-set selectors.
//!
//! A [`ColumnSet`] describes "which columns" as an expression that is only
//! evaluated against a concrete table by [`ColumnSet::resolve`]. Selectors
//! compose: union with [`ColumnSet::and`], difference with
//! [`ColumnSet::except`], narrowing with [`ColumnSet::filter`], and chaining
//! with [`ColumnSet::then`] for pivot keys.
//!
//! Resolution of names, paths and indices goes through the table's
//! [`UnresolvedColumnsPolicy`] lookups, so a selector honors `Fail`, `Skip`
//! and `Create` the same way a single lookup does.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use common_error::TabulonResult;
use tabulon_core::{ColumnPath, ColumnWithPath, DataFrame, UnresolvedColumnsPolicy};

/// Predicate over a resolved column.
#[derive(Clone)]
pub struct ColumnFilter(Arc<dyn Fn(&ColumnWithPath) -> bool + Send + Sync>);

impl ColumnFilter {
    fn matches(&self, column: &ColumnWithPath) -> bool {
        (self.0)(column)
    }
}

impl fmt::Debug for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ColumnFilter")
    }
}

/// A lazily resolved selection of columns.
#[derive(Debug, Clone)]
pub enum ColumnSet {
    /// Top-level columns by name.
    Names(Vec<String>),
    /// Columns by full path.
    Paths(Vec<ColumnPath>),
    /// Top-level columns by position.
    Indices(Vec<usize>),
    /// Top-level columns in a position range.
    Range(Range<usize>),
    /// Every top-level column.
    All,
    /// Columns at any depth, depth first.
    AtAnyDepth {
        /// Whether group columns themselves are selected.
        include_groups: bool,
        /// Whether top-level columns are selected, or only nested ones.
        include_top_level: bool,
    },
    /// Columns of the inner set matching a predicate.
    Filter(Box<ColumnSet>, ColumnFilter),
    /// Union of several sets, first occurrence wins.
    And(Vec<ColumnSet>),
    /// Columns of the first set not in (or under) the second.
    Except(Box<ColumnSet>, Box<ColumnSet>),
    /// Columns of the inner set not nested under another of its columns.
    Top(Box<ColumnSet>),
    /// Children of the group columns of the inner set.
    ColsInGroups(Box<ColumnSet>),
    /// Cartesian chain of two sets, used for pivot keys.
    Chain(Box<ColumnSet>, Box<ColumnSet>),
    /// The inner set, flagged to put its column names into pivot keys.
    Named(Box<ColumnSet>),
}

/// One stage of a resolved chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainElement {
    /// The column resolved by the stage.
    pub column: ColumnWithPath,
    /// Whether the column's name becomes part of generated key paths.
    pub include_name: bool,
}

impl ColumnSet {
    /// Top-level columns by name.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    /// Columns by path.
    pub fn paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ColumnPath>,
    {
        Self::Paths(paths.into_iter().map(Into::into).collect())
    }

    /// The top-level column at `index`.
    pub fn index(index: usize) -> Self {
        Self::Indices(vec![index])
    }

    /// Top-level columns in `range`.
    pub const fn range(range: Range<usize>) -> Self {
        Self::Range(range)
    }

    /// Every top-level column.
    pub const fn all() -> Self {
        Self::All
    }

    /// Columns at any depth.
    pub const fn at_any_depth(include_groups: bool, include_top_level: bool) -> Self {
        Self::AtAnyDepth {
            include_groups,
            include_top_level,
        }
    }

    /// Children of the group at `path`.
    pub fn children_of(path: impl Into<ColumnPath>) -> Self {
        Self::paths([path]).cols_in_groups()
    }

    /// Keep the columns matching `predicate`.
    #[must_use]
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&ColumnWithPath) -> bool + Send + Sync + 'static,
    {
        Self::Filter(Box::new(self), ColumnFilter(Arc::new(predicate)))
    }

    /// Union with `other`.
    #[must_use]
    pub fn and(self, other: impl Into<Self>) -> Self {
        match self {
            Self::And(mut sets) => {
                sets.push(other.into());
                Self::And(sets)
            }
            first => Self::And(vec![first, other.into()]),
        }
    }

    /// Drop the columns of `other`, and anything nested under them.
    #[must_use]
    pub fn except(self, other: impl Into<Self>) -> Self {
        Self::Except(Box::new(self), Box::new(other.into()))
    }

    /// Drop columns nested under another selected column.
    #[must_use]
    pub fn top(self) -> Self {
        Self::Top(Box::new(self))
    }

    /// Replace each selected group by its children.
    #[must_use]
    pub fn cols_in_groups(self) -> Self {
        Self::ColsInGroups(Box::new(self))
    }

    /// Chain with `next` for pivot keys: every column of this set is paired
    /// with every column of `next`.
    #[must_use]
    pub fn then(self, next: impl Into<Self>) -> Self {
        Self::Chain(Box::new(self), Box::new(next.into()))
    }

    /// Put this stage's column names into pivot key paths.
    #[must_use]
    pub fn with_name_flag(self) -> Self {
        Self::Named(Box::new(self))
    }

    /// Resolve against `df`.
    pub fn resolve(
        &self,
        df: &DataFrame,
        policy: UnresolvedColumnsPolicy,
    ) -> TabulonResult<Vec<ColumnWithPath>> {
        let mut out = Vec::new();
        match self {
            Self::Names(names) => {
                for name in names {
                    out.extend(df.get_column(name, policy)?);
                }
            }
            Self::Paths(paths) => {
                for path in paths {
                    out.extend(df.resolve(path, policy)?);
                }
            }
            Self::Indices(indices) => {
                for &index in indices {
                    out.extend(df.get_column_at(index, policy)?);
                }
            }
            Self::Range(range) => {
                for index in range.clone() {
                    out.extend(df.get_column_at(index, policy)?);
                }
            }
            Self::All => {
                out.extend(
                    df.columns()
                        .iter()
                        .map(|c| ColumnWithPath::new(ColumnPath::from(c.name()), c.clone())),
                );
            }
            Self::AtAnyDepth {
                include_groups,
                include_top_level,
            } => collect_at_any_depth(
                df,
                &ColumnPath::root(),
                *include_groups,
                *include_top_level,
                &mut out,
            ),
            Self::Filter(inner, predicate) => {
                out = inner.resolve(df, policy)?;
                out.retain(|c| predicate.matches(c));
            }
            Self::And(sets) => {
                let mut seen = HashSet::new();
                for set in sets {
                    for column in set.resolve(df, policy)? {
                        if seen.insert(column.path().clone()) {
                            out.push(column);
                        }
                    }
                }
            }
            Self::Except(base, excluded) => {
                let excluded: Vec<ColumnPath> = excluded
                    .resolve(df, UnresolvedColumnsPolicy::Skip)?
                    .into_iter()
                    .map(|c| c.path().clone())
                    .collect();
                out = base.resolve(df, policy)?;
                out.retain(|c| !excluded.iter().any(|e| c.path().starts_with(e)));
            }
            Self::Top(inner) => {
                let all = inner.resolve(df, policy)?;
                let paths: Vec<ColumnPath> = all.iter().map(|c| c.path().clone()).collect();
                out = all
                    .into_iter()
                    .filter(|c| {
                        !paths
                            .iter()
                            .any(|p| p.len() < c.path().len() && c.path().starts_with(p))
                    })
                    .collect();
            }
            Self::ColsInGroups(inner) => {
                for parent in inner.resolve(df, policy)? {
                    let Some(nested) = parent.column().ok().and_then(|c| c.as_group()) else {
                        continue;
                    };
                    out.extend(nested.frame().columns().iter().map(|c| {
                        ColumnWithPath::new(parent.path().child(c.name()), c.clone())
                    }));
                }
            }
            Self::Chain(..) | Self::Named(_) => {
                out = self
                    .resolve_chains(df, policy)?
                    .into_iter()
                    .filter_map(|mut chain| chain.pop().map(|e| e.column))
                    .collect();
            }
        }
        Ok(out)
    }

    /// Resolve into pivot chains: one sequence of stages per combination.
    ///
    /// Chaining `a.then(b)` flags the stages of `b` to include their column
    /// names when `b` resolves to more than one column, so the generated key
    /// paths stay distinct.
    pub fn resolve_chains(
        &self,
        df: &DataFrame,
        policy: UnresolvedColumnsPolicy,
    ) -> TabulonResult<Vec<Vec<ChainElement>>> {
        match self {
            Self::Chain(first, second) => {
                let heads = first.resolve_chains(df, policy)?;
                let tails = second.resolve_chains(df, policy)?;
                let mut out = Vec::with_capacity(heads.len() * tails.len());
                for head in &heads {
                    for tail in &tails {
                        let mut tail = tail.clone();
                        if tails.len() > 1 {
                            if let Some(stage) = tail.first_mut() {
                                stage.include_name = true;
                            }
                        }
                        let mut chain = head.clone();
                        chain.extend(tail);
                        out.push(chain);
                    }
                }
                Ok(out)
            }
            Self::Named(inner) => {
                let mut chains = inner.resolve_chains(df, policy)?;
                for chain in &mut chains {
                    if let Some(stage) = chain.first_mut() {
                        stage.include_name = true;
                    }
                }
                Ok(chains)
            }
            other => Ok(other
                .resolve(df, policy)?
                .into_iter()
                .map(|column| {
                    vec![ChainElement {
                        column,
                        include_name: false,
                    }]
                })
                .collect()),
        }
    }

    /// Resolve to paths only.
    pub fn resolve_paths(
        &self,
        df: &DataFrame,
        policy: UnresolvedColumnsPolicy,
    ) -> TabulonResult<Vec<ColumnPath>> {
        Ok(self
            .resolve(df, policy)?
            .into_iter()
            .map(|c| c.path().clone())
            .collect())
    }
}

fn collect_at_any_depth(
    df: &DataFrame,
    prefix: &ColumnPath,
    include_groups: bool,
    include_top_level: bool,
    out: &mut Vec<ColumnWithPath>,
) {
    for column in df.columns() {
        let path = prefix.child(column.name());
        let selected = (include_groups || !column.is_group()) && (include_top_level || !prefix.is_empty());
        if selected {
            out.push(ColumnWithPath::new(path.clone(), column.clone()));
        }
        if let Some(nested) = column.nested_frame() {
            collect_at_any_depth(nested, &path, include_groups, include_top_level, out);
        }
    }
}

impl From<&str> for ColumnSet {
    fn from(name: &str) -> Self {
        Self::names([name])
    }
}

impl From<String> for ColumnSet {
    fn from(name: String) -> Self {
        Self::names([name])
    }
}

impl<const N: usize> From<[&str; N]> for ColumnSet {
    fn from(names: [&str; N]) -> Self {
        Self::names(names)
    }
}

impl From<Vec<&str>> for ColumnSet {
    fn from(names: Vec<&str>) -> Self {
        Self::names(names)
    }
}

impl From<ColumnPath> for ColumnSet {
    fn from(path: ColumnPath) -> Self {
        Self::Paths(vec![path])
    }
}

impl From<&ColumnPath> for ColumnSet {
    fn from(path: &ColumnPath) -> Self {
        Self::Paths(vec![path.clone()])
    }
}

impl From<Vec<ColumnPath>> for ColumnSet {
    fn from(paths: Vec<ColumnPath>) -> Self {
        Self::Paths(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_error::TabulonError;
    use tabulon_core::testing::FrameFixture;
    use tabulon_core::ColumnKind;

    fn paths(set: &ColumnSet, df: &DataFrame) -> Vec<String> {
        set.resolve_paths(df, UnresolvedColumnsPolicy::Fail)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_primitive_selectors() {
        let df = FrameFixture::people();
        assert_eq!(paths(&ColumnSet::from(["city", "name"]), &df), vec!["city", "name"]);
        assert_eq!(paths(&ColumnSet::index(1), &df), vec!["age"]);
        assert_eq!(paths(&ColumnSet::range(1..3), &df), vec!["age", "city"]);
        assert_eq!(paths(&ColumnSet::all(), &df), vec!["name", "age", "city"]);
    }

    #[test]
    fn test_at_any_depth_flags() {
        let df = FrameFixture::nested_people();
        assert_eq!(
            paths(&ColumnSet::at_any_depth(false, true), &df),
            vec![
                "name.first",
                "name.last",
                "age",
                "info.city",
                "info.address.street",
                "info.address.zip"
            ]
        );
        assert_eq!(
            paths(&ColumnSet::at_any_depth(true, false), &df),
            vec![
                "name.first",
                "name.last",
                "info.city",
                "info.address",
                "info.address.street",
                "info.address.zip"
            ]
        );
    }

    #[test]
    fn test_composition() {
        let df = FrameFixture::nested_people();
        let leaves = ColumnSet::at_any_depth(true, true);

        let groups = leaves.clone().filter(|c| c.kind() == Some(ColumnKind::Group));
        assert_eq!(paths(&groups, &df), vec!["name", "info", "info.address"]);
        assert_eq!(paths(&groups.top(), &df), vec!["name", "info"]);

        let without_info = ColumnSet::all().except("info");
        assert_eq!(paths(&without_info, &df), vec!["name", "age"]);

        let nested_except = leaves.except(ColumnPath::from(["info", "address"]));
        assert!(!paths(&nested_except, &df).iter().any(|p| p.starts_with("info.address")));

        let union = ColumnSet::from("age").and("name").and("age");
        assert_eq!(paths(&union, &df), vec!["age", "name"]);

        assert_eq!(
            paths(&ColumnSet::children_of("info"), &df),
            vec!["info.city", "info.address"]
        );
    }

    #[test]
    fn test_resolution_follows_policy() {
        let df = FrameFixture::people();
        let set = ColumnSet::from(["name", "zzz"]);

        let err = set.resolve(&df, UnresolvedColumnsPolicy::Fail).unwrap_err();
        assert!(matches!(err, TabulonError::ColumnNotFound(_)));

        let skipped = set.resolve(&df, UnresolvedColumnsPolicy::Skip).unwrap();
        assert_eq!(skipped.len(), 1);

        let created = set.resolve(&df, UnresolvedColumnsPolicy::Create).unwrap();
        assert_eq!(created.len(), 2);
        assert!(created[1].is_placeholder());
    }

    #[test]
    fn test_chains_flag_names_of_multi_column_stages() {
        let df = FrameFixture::people();
        let chains = ColumnSet::from("city")
            .then(["name", "age"])
            .resolve_chains(&df, UnresolvedColumnsPolicy::Fail)
            .unwrap();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0][0].column.name(), "city");
        assert!(!chains[0][0].include_name);
        assert_eq!(chains[1][1].column.name(), "age");
        assert!(chains[1][1].include_name);

        let single = ColumnSet::from("city")
            .then("name")
            .resolve_chains(&df, UnresolvedColumnsPolicy::Fail)
            .unwrap();
        assert!(!single[0][1].include_name);

        let flagged = ColumnSet::from("city")
            .with_name_flag()
            .resolve_chains(&df, UnresolvedColumnsPolicy::Fail)
            .unwrap();
        assert!(flagged[0][0].include_name);

        let last = ColumnSet::from("city")
            .then("name")
            .resolve_paths(&df, UnresolvedColumnsPolicy::Fail)
            .unwrap();
        assert_eq!(last, vec![ColumnPath::from("name")]);
    }
}
