//! Property-based testing utilities for tabulon-core.
//!
//! Strategies generating random flat and nested tables, shared with the
//! other crates' property tests through the `testing` feature.

use proptest::prelude::*;

use crate::column::Column;
use crate::frame::DataFrame;
use crate::types::{DataType, Value};

// =========================================================================
// Arbitrary Strategies for Value
// =========================================================================

/// Strategy for scalar values (no rows, lists or frames).
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        // Integer-valued floats keep text round trips exact
        any::<i32>().prop_map(|i| Value::Float64(f64::from(i))),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

// =========================================================================
// Arbitrary Strategies for Column and DataFrame
// =========================================================================

fn arb_value_column(name: String, nrow: usize) -> BoxedStrategy<Column> {
    let ints_name = name.clone();
    prop_oneof![
        prop::collection::vec(prop::option::of(any::<i32>()), nrow).prop_map(move |cells| {
            let values = cells.into_iter().map(Value::from).collect();
            Column::new_value(ints_name.clone(), values, DataType::Int32)
                .expect("generated cells match the column type")
        }),
        prop::collection::vec(prop::option::of("[a-z]{0,4}"), nrow).prop_map(move |cells| {
            let values = cells.into_iter().map(Value::from).collect();
            Column::new_value(name.clone(), values, DataType::String)
                .expect("generated cells match the column type")
        }),
    ]
    .boxed()
}

fn arb_column(name: String, nrow: usize, depth: u32) -> BoxedStrategy<Column> {
    if depth == 0 {
        return arb_value_column(name, nrow);
    }
    let group_name = name.clone();
    let frame_name = name.clone();
    prop_oneof![
        3 => arb_value_column(name, nrow),
        1 => arb_frame_with_rows(nrow, depth - 1)
            .prop_map(move |df| Column::new_group(group_name.clone(), df)),
        1 => prop::collection::vec(arb_frame(0), nrow)
            .prop_map(move |frames| Column::new_frame(frame_name.clone(), frames)),
    ]
    .boxed()
}

/// Strategy for tables with exactly `nrow` rows and groups nested up to
/// `depth` levels. Every level has at least one column.
pub fn arb_frame_with_rows(nrow: usize, depth: u32) -> BoxedStrategy<DataFrame> {
    prop::collection::btree_set("[a-f]", 1..4)
        .prop_flat_map(move |names| {
            names
                .into_iter()
                .map(|name| arb_column(name, nrow, depth))
                .collect::<Vec<_>>()
        })
        .prop_map(move |columns| {
            DataFrame::with_nrow(columns, nrow).expect("generated columns are valid")
        })
        .boxed()
}

/// Strategy for tables of 0 to 4 rows with groups nested up to `depth`
/// levels.
pub fn arb_frame(depth: u32) -> BoxedStrategy<DataFrame> {
    (0usize..5)
        .prop_flat_map(move |nrow| arb_frame_with_rows(nrow, depth))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameAssertions;

    proptest! {
        #[test]
        fn prop_generated_frames_hold_invariants(df in arb_frame(2)) {
            FrameAssertions::new(&df).assert_invariants();
        }

        #[test]
        fn prop_distinct_is_idempotent(df in arb_frame(1)) {
            for column in df.columns() {
                let once = column.distinct();
                prop_assert_eq!(once.distinct(), once.clone());
                prop_assert!(once.len() <= column.len());
            }
        }

        #[test]
        fn prop_slice_keeps_kind_and_type(df in arb_frame(1)) {
            let half = df.nrow() / 2;
            let sliced = df.slice(0..half).unwrap();
            prop_assert_eq!(sliced.nrow(), half);
            for (a, b) in df.columns().iter().zip(sliced.columns()) {
                prop_assert_eq!(a.kind(), b.kind());
                prop_assert_eq!(a.data_type(), b.data_type());
            }
        }

        #[test]
        fn prop_scalar_equality_is_reflexive(v in arb_scalar()) {
            prop_assert_eq!(v.clone(), v);
        }
    }
}
