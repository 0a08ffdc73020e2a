//! Delimited text (CSV, TSV) reading and writing.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use common_config::CsvOptions;
use common_error::{TabulonError, TabulonResult};
use tabulon_core::{Column, ColumnNameGenerator, DataFrame, DataType, Value};

use crate::json::value_to_json;

/// Read a table from delimited text.
///
/// The first record after `skip_lines` is the header unless
/// `options.header` is set. Header names are made unique and empty ones are
/// named `X1`, `X2`, ... by position. Blank lines are skipped, empty fields
/// are nulls, so a record of empty fields is a row of nulls. Every column
/// then goes through the parsing pipeline of `options.parser`, so forced
/// column types apply by (legalized) column name.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> TabulonResult<DataFrame> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(ascii_byte(options.delimiter, "delimiter")?)
        .quote(ascii_byte(options.quote, "quote")?)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records().skip(options.skip_lines);

    let header: Vec<String> = if options.header.is_empty() {
        match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Ok(DataFrame::empty(0)),
        }
    } else {
        options.header.clone()
    };

    // Blank lines never reach here; a record of empty fields is a row of nulls.
    let mut rows = Vec::new();
    for record in records {
        if options.read_lines.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() > header.len() {
            return Err(TabulonError::value_error(format!(
                "line {line} has {} fields but the header has {}",
                record.len(),
                header.len()
            )));
        }
        if record.len() < header.len() && !options.allow_missing_columns {
            return Err(TabulonError::value_error(format!(
                "line {line} has {} fields but the header has {}",
                record.len(),
                header.len()
            )));
        }
        rows.push(record);
    }

    let mut generator = ColumnNameGenerator::default();
    let mut columns = Vec::with_capacity(header.len());
    for (i, raw_name) in header.iter().enumerate() {
        let name = if raw_name.trim().is_empty() {
            generator.add_unique(&format!("X{}", i + 1))
        } else {
            generator.add_unique(raw_name)
        };
        let values = rows
            .iter()
            .map(|r| match r.get(i) {
                Some(field) if !field.is_empty() => Value::from(field),
                _ => Value::Null,
            })
            .collect();
        let raw = Column::new_value(name, values, DataType::String)?;
        columns.push(raw.try_parse(&options.parser)?);
    }
    log::debug!("read {} CSV row(s) into {} column(s)", rows.len(), columns.len());

    if columns.is_empty() {
        Ok(DataFrame::empty(rows.len()))
    } else {
        DataFrame::with_nrow(columns, rows.len())
    }
}

/// Read a table from delimited text in memory.
pub fn read_csv_str(text: &str, options: &CsvOptions) -> TabulonResult<DataFrame> {
    read_csv(text.as_bytes(), options)
}

/// Read a table from a delimited text file.
pub fn read_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> TabulonResult<DataFrame> {
    let file = File::open(path.as_ref())?;
    log::debug!("reading CSV from {}", path.as_ref().display());
    read_csv(BufReader::new(file), options)
}

/// Write the top-level columns of a table as delimited text.
///
/// Nulls are written as empty fields. Group cells are written as JSON
/// objects, frame and list cells as JSON arrays.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W, options: &CsvOptions) -> TabulonResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(ascii_byte(options.delimiter, "delimiter")?)
        .quote(ascii_byte(options.quote, "quote")?)
        .from_writer(writer);
    if df.ncol() > 0 {
        csv_writer.write_record(df.column_names())?;
    }
    for row in 0..df.nrow() {
        let cells: Vec<String> = df
            .columns()
            .iter()
            .map(|c| cell_text(&c.get(row).unwrap_or(Value::Null)))
            .collect();
        csv_writer.write_record(&cells)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a table as delimited text into a string.
pub fn write_csv_str(df: &DataFrame, options: &CsvOptions) -> TabulonResult<String> {
    let mut buffer = Vec::new();
    write_csv(df, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(TabulonError::external)
}

/// Write a table as delimited text to a file, replacing it.
pub fn write_csv_path(
    df: &DataFrame,
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> TabulonResult<()> {
    let file = File::create(path.as_ref())?;
    log::debug!("writing {} CSV row(s) to {}", df.nrow(), path.as_ref().display());
    write_csv(df, BufWriter::new(file), options)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Row(_) | Value::Frame(_) | Value::List(_) => value_to_json(value).to_string(),
        other => other.to_string(),
    }
}

fn ascii_byte(c: char, what: &str) -> TabulonResult<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| TabulonError::invalid_parameter(format!("{what} '{c}' is not an ASCII character")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_config::{ColType, ParserOptions};
    use tabulon_core::testing::{frame, FrameAssertions, FrameFixture};
    use tabulon_core::ColumnPath;

    fn read(text: &str) -> DataFrame {
        read_csv_str(text, &CsvOptions::default()).unwrap()
    }

    #[test]
    fn test_read_infers_types() {
        let df = read("name,age\nAlice,30\nBob,25\n");
        FrameAssertions::new(&df)
            .assert_columns(&["name", "age"])
            .assert_nrow(2)
            .assert_values(&ColumnPath::from("age"), &[Value::Int32(30), Value::Int32(25)]);
        assert_eq!(df.column("name").unwrap().data_type(), DataType::String);
    }

    #[test]
    fn test_header_legalization() {
        let df = read("a,a,\n1,2,3\n");
        FrameAssertions::new(&df).assert_columns(&["a", "a_2", "X3"]);
    }

    #[test]
    fn test_skip_and_limit() {
        let options = CsvOptions::default().with_skip_lines(1).with_read_lines(2);
        let df = read_csv_str("# comment\nx\n1\n2\n3\n", &options).unwrap();
        FrameAssertions::new(&df)
            .assert_columns(&["x"])
            .assert_values(&ColumnPath::from("x"), &[Value::Int32(1), Value::Int32(2)]);
    }

    #[test]
    fn test_explicit_header_reads_every_record() {
        let options = CsvOptions::default().with_header(["x", "y"]);
        let df = read_csv_str("1,2\n3,4\n", &options).unwrap();
        FrameAssertions::new(&df).assert_columns(&["x", "y"]).assert_nrow(2);
    }

    #[test]
    fn test_short_records() {
        let df = read("a,b\n1\n2,3\n");
        FrameAssertions::new(&df).assert_values(&ColumnPath::from("b"), &[Value::Null, Value::Int32(3)]);

        let options = CsvOptions {
            allow_missing_columns: false,
            ..CsvOptions::default()
        };
        let err = read_csv_str("a,b\n1\n", &options).unwrap_err();
        assert!(matches!(err, TabulonError::ValueError(_)));
    }

    #[test]
    fn test_null_strings_and_null_rows() {
        let df = read("a,b\nNA,x\n,\n2,y\n");
        FrameAssertions::new(&df)
            .assert_nrow(3)
            .assert_values(&ColumnPath::from("a"), &[Value::Null, Value::Null, Value::Int32(2)])
            .assert_values(
                &ColumnPath::from("b"),
                &[Value::from("x"), Value::Null, Value::from("y")],
            );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let df = read("a,b\n1,x\n\n3,z\n\n");
        FrameAssertions::new(&df)
            .assert_nrow(2)
            .assert_values(&ColumnPath::from("a"), &[Value::Int32(1), Value::Int32(3)]);
    }

    #[test]
    fn test_null_rows_survive_write_then_read() {
        let df = frame(vec![Column::new_value(
            "a",
            vec![Value::Int32(1), Value::Null, Value::Int32(3)],
            DataType::Int32,
        )
        .unwrap()]);
        let text = write_csv_str(&df, &CsvOptions::default()).unwrap();
        assert_eq!(text, "a\n1\n\"\"\n3\n");
        assert_eq!(read(&text), df);
    }

    #[test]
    fn test_forced_types() {
        let parser = ParserOptions::default().with_col_type("a", ColType::Long);
        let options = CsvOptions::default().with_parser(parser);
        let df = read_csv_str("a,b\n1,2\n", &options).unwrap();
        assert_eq!(df.column("a").unwrap().data_type(), DataType::Int64);
        assert_eq!(df.column("b").unwrap().data_type(), DataType::Int32);

        let err = read_csv_str("a\nx\n", &options).unwrap_err();
        assert!(matches!(err, TabulonError::ParseError { .. }));
    }

    #[test]
    fn test_tsv_and_bad_delimiter() {
        let df = read_csv_str("a\tb\n1\t2\n", &CsvOptions::tsv()).unwrap();
        FrameAssertions::new(&df).assert_columns(&["a", "b"]);

        let err = read_csv_str("a", &CsvOptions::default().with_delimiter('§')).unwrap_err();
        assert!(matches!(err, TabulonError::InvalidParameter(_)));
    }

    #[test]
    fn test_write_nested_cells_as_json() {
        let text = write_csv_str(&FrameFixture::nested_people(), &CsvOptions::default()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,age,info"));
        assert_eq!(
            lines.nth(2),
            Some(r#""{""first"":""Charlie"",""last"":""Daniels""}",20,"{""address"":{""street"":""Arbat"",""zip"":3}}""#)
        );
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let df = FrameFixture::people();
        let text = write_csv_str(&df, &CsvOptions::default()).unwrap();
        assert_eq!(read(&text), df);
    }
}
