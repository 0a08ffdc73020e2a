//! Integration tests for tabulon-core
//!
//! These tests cover the public surface of tabulon-core across modules
//! without duplicating the unit tests in individual files.

use common_config::{ColType, ParserOptions};
use common_error::TabulonError;
use proptest::prelude::*;
use tabulon_core::testing::{int_col, string_col, FrameFixture};
use tabulon_core::*;

fn arb_flat_frame() -> impl Strategy<Value = DataFrame> {
    (0usize..6).prop_flat_map(|nrow| {
        (
            prop::collection::vec(any::<i32>(), nrow),
            prop::collection::vec(prop::option::of("[a-z]{0,3}"), nrow),
        )
            .prop_map(|(ints, strings)| {
                DataFrame::new(vec![
                    int_col("i", &ints),
                    Column::new_value(
                        "s",
                        strings.into_iter().map(Value::from).collect(),
                        DataType::String,
                    )
                    .unwrap(),
                ])
                .unwrap()
            })
    })
}

#[test]
fn test_value_equality_and_conversion() {
    assert_eq!(Value::Int32(42), Value::Int32(42));
    assert_ne!(Value::Int32(42), Value::Int64(42));
    assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
    assert_eq!(format!("{:?}", Value::Int32(42)), "Int32(42)");
    assert_eq!(format!("{:?}", Value::Null), "Null");
}

#[test]
fn test_datatype_operations() {
    assert_eq!(format!("{}", DataType::Int64), "Int64");
    assert_eq!(
        format!("{}", DataType::List(Box::new(DataType::String))),
        "List<String>"
    );
    let json = serde_json::to_string(&DataType::Decimal).unwrap();
    assert_eq!(serde_json::from_str::<DataType>(&json).unwrap(), DataType::Decimal);
}

#[test]
fn test_frame_column_rejects_null() {
    let a = FrameFixture::pair();
    let err = FrameColumn::from_values("frames", vec![Value::Frame(a), Value::Null]).unwrap_err();
    assert!(err.is_structural_error());
    assert!(err
        .to_string()
        .contains("FrameColumn cannot contain null values"));
}

#[test]
fn test_policy_completeness_for_one_missing_path() {
    let df = FrameFixture::nested_people();
    let missing = ColumnPath::from(["info", "address", "country"]);

    let err = df
        .resolve(&missing, UnresolvedColumnsPolicy::Fail)
        .unwrap_err();
    assert!(matches!(err, TabulonError::ColumnNotFound(_)));

    let skipped = df.resolve(&missing, UnresolvedColumnsPolicy::Skip).unwrap();
    assert!(skipped.is_none());

    let created = df
        .resolve(&missing, UnresolvedColumnsPolicy::Create)
        .unwrap()
        .unwrap();
    assert_eq!(created.path(), &missing);
    assert_eq!(created.name(), "country");
    assert!(matches!(
        created.column(),
        Err(TabulonError::UnresolvedPlaceholder(_))
    ));
    assert!(created.into_column().is_err());
}

#[test]
fn test_policy_by_name_and_index() {
    let df = FrameFixture::people();
    assert!(df.get_column("zzz", UnresolvedColumnsPolicy::Fail).is_err());
    assert!(df
        .get_column_at(7, UnresolvedColumnsPolicy::Skip)
        .unwrap()
        .is_none());
    let placeholder = df
        .get_column_at(7, UnresolvedColumnsPolicy::Create)
        .unwrap()
        .unwrap();
    assert_eq!(placeholder.name(), "7");

    let age = df
        .get_column_at(1, UnresolvedColumnsPolicy::Fail)
        .unwrap()
        .unwrap();
    assert_eq!(age.column().unwrap().name(), "age");
}

#[test]
fn test_try_parse_scenario() {
    let df = FrameFixture::pair()
        .add(string_col("x", &["1", "2"]))
        .unwrap();
    let parsed = df.parse_all(&ParserOptions::default()).unwrap();
    assert_eq!(parsed.column("x").unwrap().data_type(), DataType::Int32);
    assert_eq!(parsed.column("name").unwrap().data_type(), DataType::String);

    let df = DataFrame::new(vec![string_col("x", &["1", "2", "bad"])]).unwrap();
    let parsed = df.parse_all(&ParserOptions::default()).unwrap();
    assert_eq!(parsed.column("x").unwrap().data_type(), DataType::String);
}

#[test]
fn test_forced_column_type_through_parse_all() {
    let df = DataFrame::new(vec![string_col("id", &["1", "2"]), string_col("v", &["a", "b"])])
        .unwrap();
    let options = ParserOptions::default().with_col_type("id", ColType::Decimal);
    let parsed = df.parse_all(&options).unwrap();
    assert_eq!(parsed.column("id").unwrap().data_type(), DataType::Decimal);

    let strict = ParserOptions::default().with_col_type("v", ColType::Int);
    let err = df.parse_all(&strict).unwrap_err();
    assert_eq!(err.to_string(), "ParseError: can't parse 'a' to type Int32");
}

#[test]
fn test_original_untouched_by_transform() {
    let df = FrameFixture::people();
    let before = df.clone();
    let _ = df.set_column("age", int_col("age", &[1, 2, 3])).unwrap();
    assert_eq!(df, before);
    assert!(df.shares_columns(&before));
}

#[test]
fn test_schema_display() {
    let rendered = FrameFixture::pair().schema().to_string();
    assert_eq!(rendered, "DataFrame\n├─ name (String)\n└─ age (Int32)\n");
}

#[test]
fn test_name_generator_for_headers() {
    let mut generator = ColumnNameGenerator::default();
    let names: Vec<String> = ["a", "", "a", ""]
        .iter()
        .map(|&n| generator.add_unique(if n.is_empty() { "untitled" } else { n }))
        .collect();
    assert_eq!(names, vec!["a", "untitled", "a_2", "untitled_2"]);
}

proptest! {
    #[test]
    fn prop_rows_reindex_round_trips(df in arb_flat_frame()) {
        let reversed: Vec<usize> = (0..df.nrow()).rev().collect();
        let out = df.rows(&reversed).unwrap();
        prop_assert_eq!(out.nrow(), df.nrow());
        let back = out.rows(&reversed).unwrap();
        prop_assert_eq!(back, df);
    }

    #[test]
    fn prop_integer_strings_parse_as_int(values in prop::collection::vec(any::<i32>(), 1..20)) {
        let text: Vec<String> = values.iter().map(ToString::to_string).collect();
        let refs: Vec<&str> = text.iter().map(String::as_str).collect();
        let parsed = string_col("x", &refs).try_parse(&ParserOptions::default()).unwrap();
        prop_assert_eq!(parsed.data_type(), DataType::Int32);
        prop_assert_eq!(parsed.values(), values.into_iter().map(Value::Int32).collect::<Vec<_>>());
    }

    #[test]
    fn prop_wide_integer_strings_parse_as_long(
        values in prop::collection::vec(i64::from(i32::MAX) + 1..i64::MAX, 1..20)
    ) {
        let text: Vec<String> = values.iter().map(ToString::to_string).collect();
        let refs: Vec<&str> = text.iter().map(String::as_str).collect();
        let parsed = string_col("x", &refs).try_parse(&ParserOptions::default()).unwrap();
        prop_assert_eq!(parsed.data_type(), DataType::Int64);
    }
}
