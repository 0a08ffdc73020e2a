//! JSON reading and writing.
//!
//! A JSON document maps to a table as a list of records:
//!
//! - object keys become columns, in first-seen order, and nested objects
//!   become group columns;
//! - arrays of objects become frame columns, arrays of primitives become
//!   list-valued columns;
//! - primitives found among objects go to a `value` column, arrays found
//!   among objects to an `array` column (both renamed when a key already
//!   uses the name).
//!
//! Writing is the inverse: a table becomes an array with one object per row
//! holding every column, so column order and all-null columns survive a
//! round trip. Group cells are nested objects, frame cells arrays and null
//! cells `null`.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use common_config::JsonOptions;
use common_error::TabulonResult;
use serde_json::{Map, Number, Value as Json};
use tabulon_core::{Column, ColumnNameGenerator, DataFrame, FrameColumn, Row, Value};

const VALUE_COLUMN: &str = "value";
const ARRAY_COLUMN: &str = "array";

// ============================================================================
// Reading
// ============================================================================

/// Read a table from JSON text.
pub fn read_json_str(text: &str, options: &JsonOptions) -> TabulonResult<DataFrame> {
    let parsed: Json = serde_json::from_str(text)?;
    from_document(parsed, options)
}

/// Read a table from a JSON stream.
pub fn read_json<R: Read>(reader: R, options: &JsonOptions) -> TabulonResult<DataFrame> {
    let parsed: Json = serde_json::from_reader(reader)?;
    from_document(parsed, options)
}

/// Read a table from a JSON file.
pub fn read_json_path(path: impl AsRef<Path>, options: &JsonOptions) -> TabulonResult<DataFrame> {
    let file = File::open(path.as_ref())?;
    log::debug!("reading JSON from {}", path.as_ref().display());
    read_json(BufReader::new(file), options)
}

fn from_document(parsed: Json, options: &JsonOptions) -> TabulonResult<DataFrame> {
    let records = match parsed {
        Json::Array(items) => items,
        other => vec![other],
    };
    let df = from_records(&records)?.df;
    log::debug!("read {} JSON record(s) into {} column(s)", df.nrow(), df.ncol());
    if options.parse_strings {
        df.parse_all(&options.parser)
    } else {
        Ok(df)
    }
}

/// A table read from records. `unnamed` is set when its only column is the
/// generated `value` or `array` column, meaning the records were not
/// objects.
struct Records {
    df: DataFrame,
    unnamed: bool,
}

fn from_records(records: &[Json]) -> TabulonResult<Records> {
    let mut has_primitive = false;
    let mut has_array = false;
    let mut generator = ColumnNameGenerator::default();
    for record in records {
        match record {
            Json::Object(fields) => fields.keys().for_each(|k| generator.add_if_absent(k.as_str())),
            Json::Array(_) => has_array = true,
            Json::Null => {}
            _ => has_primitive = true,
        }
    }
    let value_column = has_primitive.then(|| generator.add_unique(VALUE_COLUMN));
    let array_column = has_array.then(|| generator.add_unique(ARRAY_COLUMN));

    let mut columns = Vec::with_capacity(generator.names().len());
    for name in generator.names() {
        let column = if value_column.as_ref() == Some(name) {
            let values = records
                .iter()
                .map(|r| match r {
                    Json::Object(_) | Json::Array(_) => Value::Null,
                    other => scalar_from_json(other),
                })
                .collect();
            Column::with_type_inference(name.as_str(), values)?
        } else if array_column.as_ref() == Some(name) {
            array_column_from(name, records)?
        } else {
            let values: Vec<Json> = records
                .iter()
                .map(|r| match r {
                    Json::Object(fields) => fields.get(name).cloned().unwrap_or(Json::Null),
                    _ => Json::Null,
                })
                .collect();
            let nested = from_records(&values)?;
            if nested.df.ncol() == 0 {
                Column::with_type_inference(name.as_str(), vec![Value::Null; values.len()])?
            } else if nested.unnamed {
                nested.df.columns()[0].rename(name.as_str())
            } else {
                Column::new_group(name.as_str(), nested.df)
            }
        };
        columns.push(column);
    }

    let unnamed = columns.len() == 1
        && (value_column.is_some() || array_column.is_some())
        && generator.names().len() == 1;
    let df = if columns.is_empty() {
        DataFrame::empty(records.len())
    } else {
        DataFrame::with_nrow(columns, records.len())?
    };
    Ok(Records { df, unnamed })
}

fn array_column_from(name: &str, records: &[Json]) -> TabulonResult<Column> {
    let mut elements = Vec::new();
    let mut starts = Vec::with_capacity(records.len());
    for record in records {
        starts.push(elements.len());
        if let Json::Array(items) = record {
            elements.extend(items.iter().cloned());
        }
    }

    let parsed = from_records(&elements)?;
    if !parsed.unnamed {
        return Ok(Column::Frame(FrameColumn::from_start_indices(
            name,
            &parsed.df,
            &starts,
        )?));
    }
    let cells = parsed.df.columns()[0].values();
    let lists = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(cells.len());
            Value::List(cells[start..end].to_vec())
        })
        .collect();
    Column::with_type_inference(name, lists)
}

fn scalar_from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).map_or(Value::Int64(i), Value::Int32),
            None => n.as_f64().map_or(Value::Null, Value::Float64),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(scalar_from_json).collect()),
        Json::Object(fields) => Value::Row(Row::new(
            fields.iter().map(|(k, v)| (k.clone(), scalar_from_json(v))),
        )),
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Write a table as JSON text.
pub fn write_json_str(df: &DataFrame, options: &JsonOptions) -> TabulonResult<String> {
    let json = frame_to_json(df);
    Ok(if options.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    })
}

/// Write a table as JSON to a stream.
pub fn write_json<W: Write>(df: &DataFrame, writer: W, options: &JsonOptions) -> TabulonResult<()> {
    let json = frame_to_json(df);
    if options.pretty {
        serde_json::to_writer_pretty(writer, &json)?;
    } else {
        serde_json::to_writer(writer, &json)?;
    }
    Ok(())
}

/// Write a table as JSON to a file, replacing it.
pub fn write_json_path(
    df: &DataFrame,
    path: impl AsRef<Path>,
    options: &JsonOptions,
) -> TabulonResult<()> {
    let file = File::create(path.as_ref())?;
    log::debug!("writing {} row(s) of JSON to {}", df.nrow(), path.as_ref().display());
    write_json(df, std::io::BufWriter::new(file), options)
}

/// A table as a JSON array with one object per row.
pub fn frame_to_json(df: &DataFrame) -> Json {
    Json::Array((0..df.nrow()).map(|row| row_of(df, row)).collect())
}

fn row_of(df: &DataFrame, row: usize) -> Json {
    let fields = df
        .columns()
        .iter()
        .map(|column| {
            let json = match column {
                Column::Group(group) => row_of(group.frame(), row),
                Column::Frame(frames) => frames.get(row).map_or(Json::Null, frame_to_json),
                Column::Value(values) => values.get(row).map_or(Json::Null, value_to_json),
            };
            (column.name().to_string(), json)
        })
        .collect();
    Json::Object(fields)
}

/// One cell as JSON. Booleans and numbers stay typed, other scalars are
/// written as their text. Null fields of row cells are left out.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int32(i) => Json::from(*i),
        Value::Int64(i) => Json::from(*i),
        Value::Float64(x) => Number::from_f64(*x).map_or(Json::Null, Json::Number),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Row(row) => {
            let fields = row
                .fields()
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect::<Map<_, _>>();
            Json::Object(fields)
        }
        Value::Frame(df) => frame_to_json(df),
        other => Json::String(other.to_string()),
    }
}
