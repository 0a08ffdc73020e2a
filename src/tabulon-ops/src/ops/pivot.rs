//! Pivoting key columns into a one-row table.
//!
//! Every distinct combination of key values becomes a column whose path is
//! built from the values. For a single key column `city` with values
//! `London` and `Dubai`, the result has columns `London` and `Dubai`; with
//! several key columns, or with `inward(true)`, each path starts with the
//! key column's own path (`city.London`).

use std::collections::{HashMap, HashSet};

use common_error::{TabulonError, TabulonResult};
use tabulon_core::{Column, ColumnPath, DataFrame, DataType, UnresolvedColumnsPolicy, Value};

use crate::insert::{insert_impl, ColumnToInsert};
use crate::selector::{ChainElement, ColumnSet};

/// Key columns selected for a pivot.
#[derive(Debug, Clone)]
pub struct Pivot<'a> {
    df: &'a DataFrame,
    columns: ColumnSet,
    inward: Option<bool>,
}

/// Rows of one key combination.
struct KeyGroup {
    path: ColumnPath,
    rows: Vec<usize>,
}

impl<'a> Pivot<'a> {
    /// Pivot `df` on `columns`. Chain sets with [`ColumnSet::then`] to nest
    /// the keys of one column under the keys of another.
    pub fn new(df: &'a DataFrame, columns: impl Into<ColumnSet>) -> Self {
        Self {
            df,
            columns: columns.into(),
            inward: None,
        }
    }

    /// Whether key paths start with the key column's path. By default they
    /// do when more than one key column is pivoted.
    #[must_use]
    pub fn inward(mut self, inward: bool) -> Self {
        self.inward = Some(inward);
        self
    }

    /// One row with a frame cell per key combination, holding the rows of
    /// that combination.
    pub fn frames(&self) -> TabulonResult<DataFrame> {
        let groups = self.key_groups()?;
        let columns = groups
            .into_iter()
            .map(|g| {
                let rows = self.df.rows(&g.rows)?;
                let name = g.path.name().unwrap_or_default().to_string();
                Ok(ColumnToInsert::new(g.path, Column::new_frame(name, vec![rows])))
            })
            .collect::<TabulonResult<Vec<_>>>()?;
        insert_impl(&DataFrame::empty(1), columns, None)
    }

    /// One row with the number of rows per key combination.
    pub fn count(&self) -> TabulonResult<DataFrame> {
        let groups = self.key_groups()?;
        let columns = groups
            .into_iter()
            .map(|g| {
                let count = i32::try_from(g.rows.len()).map_err(|_| {
                    TabulonError::value_error(format!("{} rows do not fit an Int32 count", g.rows.len()))
                })?;
                let name = g.path.name().unwrap_or_default().to_string();
                let column = Column::new_value(name, vec![Value::Int32(count)], DataType::Int32)?;
                Ok(ColumnToInsert::new(g.path, column))
            })
            .collect::<TabulonResult<Vec<_>>>()?;
        insert_impl(&DataFrame::empty(1), columns, None)
    }

    fn key_groups(&self) -> TabulonResult<Vec<KeyGroup>> {
        let chains = self
            .columns
            .resolve_chains(self.df, UnresolvedColumnsPolicy::Fail)?;
        let inward = self.inward.unwrap_or_else(|| {
            chains
                .iter()
                .filter_map(|chain| chain.first().map(|e| e.column.path().clone()))
                .collect::<HashSet<_>>()
                .len()
                > 1
        });

        let mut groups = Vec::new();
        for chain in &chains {
            let columns = chain
                .iter()
                .map(|e| e.column.column())
                .collect::<TabulonResult<Vec<_>>>()?;

            let mut order: Vec<Vec<Value>> = Vec::new();
            let mut rows: HashMap<Vec<Value>, Vec<usize>> = HashMap::new();
            for row in 0..self.df.nrow() {
                let key: Vec<Value> = columns
                    .iter()
                    .map(|c| c.get(row).unwrap_or(Value::Null))
                    .collect();
                rows.entry(key.clone())
                    .or_insert_with(|| {
                        order.push(key);
                        Vec::new()
                    })
                    .push(row);
            }

            for key in order {
                let rows = rows.remove(&key).unwrap_or_default();
                groups.push(KeyGroup {
                    path: key_path(chain, &key, inward),
                    rows,
                });
            }
        }
        log::debug!("pivot on {} chain(s) gave {} key(s)", chains.len(), groups.len());
        Ok(groups)
    }
}

fn key_path(chain: &[ChainElement], key: &[Value], inward: bool) -> ColumnPath {
    let mut segments: Vec<String> = Vec::new();
    for (i, (stage, value)) in chain.iter().zip(key).enumerate() {
        if i == 0 && inward {
            segments.extend(stage.column.path().segments().iter().cloned());
        } else if stage.include_name {
            segments.push(stage.column.name().to_string());
        }
        segments.push(value.to_string());
    }
    ColumnPath::new(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulon_core::testing::{frame, int_col, opt_string_col, string_col, FrameAssertions};

    fn visits() -> DataFrame {
        frame(vec![
            string_col("city", &["London", "Dubai", "London", "Moscow"]),
            string_col("kind", &["work", "rest", "rest", "work"]),
            int_col("days", &[3, 7, 2, 1]),
        ])
    }

    #[test]
    fn test_count_single_key() {
        let out = Pivot::new(&visits(), "city").count().unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["London", "Dubai", "Moscow"])
            .assert_nrow(1)
            .assert_values(&ColumnPath::from("London"), &[Value::Int32(2)]);
    }

    #[test]
    fn test_two_keys_go_inward() {
        let out = Pivot::new(&visits(), ["city", "kind"]).count().unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["city", "kind"])
            .assert_group_columns(&ColumnPath::from("city"), &["London", "Dubai", "Moscow"])
            .assert_group_columns(&ColumnPath::from("kind"), &["work", "rest"])
            .assert_values(&ColumnPath::from(["kind", "rest"]), &[Value::Int32(2)]);

        let out = Pivot::new(&visits(), "city").inward(true).count().unwrap();
        FrameAssertions::new(&out).assert_columns(&["city"]);
    }

    #[test]
    fn test_chained_keys_nest() {
        let set = ColumnSet::from("city").then("kind");
        let out = Pivot::new(&visits(), set).count().unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["London", "Dubai", "Moscow"])
            .assert_group_columns(&ColumnPath::from("London"), &["work", "rest"])
            .assert_values(&ColumnPath::from(["Dubai", "rest"]), &[Value::Int32(1)]);

        let set = ColumnSet::from("city").then(ColumnSet::from("kind").with_name_flag());
        let out = Pivot::new(&visits(), set).count().unwrap();
        FrameAssertions::new(&out)
            .assert_group_columns(&ColumnPath::from(["Moscow", "kind"]), &["work"]);
    }

    #[test]
    fn test_frames_hold_matching_rows() {
        let out = Pivot::new(&visits(), "kind").frames().unwrap();
        let cell = out.column("rest").unwrap().frame_at(0).unwrap().clone();
        FrameAssertions::new(&cell)
            .assert_columns(&["city", "kind", "days"])
            .assert_values(&ColumnPath::from("days"), &[Value::Int32(7), Value::Int32(2)]);
    }

    #[test]
    fn test_null_keys() {
        let df = frame(vec![opt_string_col("k", &[Some("a"), None, None])]);
        let out = Pivot::new(&df, "k").count().unwrap();
        FrameAssertions::new(&out)
            .assert_columns(&["a", "null"])
            .assert_values(&ColumnPath::from("null"), &[Value::Int32(2)]);
    }
}
