//! The string parsing pipeline.
//!
//! A string column is converted by trying each parser of the cascade in
//! order; the first parser that accepts every non-null value wins. Values in
//! the configured null-string set become nulls before any parser runs. When
//! no parser accepts the whole column it stays `String`: automatic parsing
//! never fails. Forcing a type (per column in `ParserOptions::col_types`, or
//! with [`ValueColumn::parse_to`]) fails on the first value that does not
//! parse.

mod parsers;

use common_config::{ColType, ParserOptions};
use common_error::{TabulonError, TabulonResult};
use log::debug;

pub use parsers::{cascade, parser_for, StringParser};

use crate::column::{Column, FrameColumn, ValueColumn};
use crate::frame::DataFrame;
use crate::types::{DataType, Value};

/// Outcome of parsing one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    /// The resulting column.
    pub column: Column,
    /// The parser that was applied, `None` when the column stayed as it was.
    pub parsed_as: Option<ColType>,
    /// Largest decimal scale among parsed numbers, capped by
    /// `ParserOptions::max_scale`. `None` for non-numeric results.
    pub max_scale: Option<u32>,
}

impl ParseReport {
    fn unchanged(column: Column) -> Self {
        Self {
            column,
            parsed_as: None,
            max_scale: None,
        }
    }
}

/// Cells of a string column after trimming and null-string mapping.
struct RawCells<'a> {
    cells: Vec<Option<&'a str>>,
}

impl<'a> RawCells<'a> {
    /// `None` when the column is not a string column.
    fn of(column: &'a ValueColumn, options: &ParserOptions) -> Option<Self> {
        if column.data_type() != &DataType::String {
            return None;
        }
        let cells = column
            .iter()
            .map(|v| {
                let s = v.as_str()?;
                let trimmed = if options.trim { s.trim() } else { s };
                (!options.is_null_string(s) && !options.is_null_string(trimmed)).then_some(trimmed)
            })
            .collect();
        Some(Self { cells })
    }

    fn all_null(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Parse every cell with `parser`, stopping at the first failure.
    fn parse_with(
        &self,
        parser: &dyn StringParser,
        options: &ParserOptions,
    ) -> Result<(Vec<Value>, Option<u32>), &'a str> {
        let mut values = Vec::with_capacity(self.cells.len());
        let mut max_scale: Option<u32> = None;
        for cell in &self.cells {
            match cell {
                None => values.push(Value::Null),
                Some(s) => {
                    let value = parser.parse(s, options).ok_or(*s)?;
                    if let Some(scale) = parser.scale(&value, s) {
                        max_scale = Some(max_scale.map_or(scale, |m| m.max(scale)));
                    }
                    values.push(value);
                }
            }
        }
        Ok((values, max_scale.map(|m| m.min(options.max_scale))))
    }
}

/// The source column with null strings replaced by nulls.
fn with_nulls_mapped(column: &ValueColumn, options: &ParserOptions) -> ValueColumn {
    let values = column
        .iter()
        .map(|v| match v.as_str() {
            Some(s) if options.is_null_string(s) || (options.trim && options.is_null_string(s.trim())) => {
                Value::Null
            }
            _ => v.clone(),
        })
        .collect();
    column.with_values(values)
}

impl ValueColumn {
    /// Parse a string column with the cascade. Other columns are returned
    /// unchanged. Fails only when a forced type is configured for this
    /// column and a value does not parse.
    pub fn try_parse(&self, options: &ParserOptions) -> TabulonResult<Column> {
        self.try_parse_with_report(options).map(|r| r.column)
    }

    /// [`ValueColumn::try_parse`], also reporting the chosen parser and the
    /// largest decimal scale.
    pub fn try_parse_with_report(&self, options: &ParserOptions) -> TabulonResult<ParseReport> {
        let Some(raw) = RawCells::of(self, options) else {
            return Ok(ParseReport::unchanged(Column::Value(self.clone())));
        };

        if let Some(forced) = options.col_type(self.name()) {
            return self.parse_forced(&raw, forced, options);
        }

        if raw.all_null() {
            return Ok(ParseReport::unchanged(Column::Value(with_nulls_mapped(self, options))));
        }

        for parser in cascade(options) {
            if let Ok((values, max_scale)) = raw.parse_with(parser, options) {
                debug!(
                    "column '{}' parsed as {:?} ({} rows)",
                    self.name(),
                    parser.col_type(),
                    values.len()
                );
                let column = ValueColumn::from_checked(self.name().to_string(), values, parser.data_type());
                return Ok(ParseReport {
                    column: Column::Value(column),
                    parsed_as: Some(parser.col_type()),
                    max_scale,
                });
            }
        }

        debug!("column '{}' kept as String", self.name());
        Ok(ParseReport::unchanged(Column::Value(with_nulls_mapped(self, options))))
    }

    /// Parse every value to `ty`, failing with `ParseError` on the first
    /// value that does not parse. A column that is not a string column is
    /// cast instead.
    pub fn parse_to(&self, ty: ColType, options: &ParserOptions) -> TabulonResult<Column> {
        match RawCells::of(self, options) {
            Some(raw) => self.parse_forced(&raw, ty, options).map(|r| r.column),
            None => Column::Value(self.clone()).cast(&ty.into()),
        }
    }

    fn parse_forced(
        &self,
        raw: &RawCells<'_>,
        ty: ColType,
        options: &ParserOptions,
    ) -> TabulonResult<ParseReport> {
        if ty == ColType::String {
            return Ok(ParseReport {
                column: Column::Value(with_nulls_mapped(self, options)),
                parsed_as: Some(ColType::String),
                max_scale: None,
            });
        }
        let parser = parser_for(ty);
        let (values, max_scale) = raw
            .parse_with(parser, options)
            .map_err(|bad| TabulonError::parse_error(bad, parser.data_type().display_name()))?;
        debug!("column '{}' forced to {ty:?}", self.name());
        Ok(ParseReport {
            column: Column::Value(ValueColumn::from_checked(
                self.name().to_string(),
                values,
                parser.data_type(),
            )),
            parsed_as: Some(ty),
            max_scale,
        })
    }
}

impl Column {
    /// Parse string cells: value columns with the cascade, group columns
    /// through their nested table, frame columns cell by cell.
    pub fn try_parse(&self, options: &ParserOptions) -> TabulonResult<Self> {
        match self {
            Self::Value(c) => c.try_parse(options),
            Self::Group(g) => Ok(Self::Group(g.with_frame(g.frame().parse_all(options)?))),
            Self::Frame(f) => {
                let frames = f
                    .frames()
                    .iter()
                    .map(|df| df.parse_all(options))
                    .collect::<TabulonResult<Vec<_>>>()?;
                Ok(Self::Frame(FrameColumn::new(f.name(), frames)))
            }
        }
    }

    /// Parse a value column to `ty`; see [`ValueColumn::parse_to`].
    pub fn parse_to(&self, ty: ColType, options: &ParserOptions) -> TabulonResult<Self> {
        match self {
            Self::Value(c) => c.parse_to(ty, options),
            other => Err(TabulonError::type_error(format!(
                "cannot parse {} column '{}' to {}",
                other.kind(),
                other.name(),
                DataType::from(ty)
            ))),
        }
    }
}

impl DataFrame {
    /// Parse every string column at any depth, including the tables inside
    /// frame columns.
    pub fn parse_all(&self, options: &ParserOptions) -> TabulonResult<Self> {
        let columns = self
            .columns()
            .iter()
            .map(|c| c.try_parse(options))
            .collect::<TabulonResult<Vec<_>>>()?;
        Self::with_nrow(columns, self.nrow())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn strings(name: &str, values: &[Option<&str>]) -> ValueColumn {
        ValueColumn::new(
            name,
            values.iter().map(|v| Value::from(*v)).collect(),
            DataType::String,
        )
        .unwrap()
    }

    #[test]
    fn test_cascade_falls_back_to_string() {
        let col = strings("x", &[Some("1"), Some("2"), Some("bad")]);
        let report = col.try_parse_with_report(&ParserOptions::default()).unwrap();
        assert_eq!(report.parsed_as, None);
        assert_eq!(report.column.data_type(), DataType::String);
        assert_eq!(report.column.get(2), Some(Value::from("bad")));
    }

    #[test]
    fn test_cascade_picks_narrowest() {
        let col = strings("x", &[Some("1"), Some("2"), Some("3")]);
        let parsed = col.try_parse(&ParserOptions::default()).unwrap();
        assert_eq!(parsed.data_type(), DataType::Int32);
        assert_eq!(
            parsed.values(),
            vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]
        );

        let wide = strings("x", &[Some("1"), Some("3000000000")]);
        assert_eq!(
            wide.try_parse(&ParserOptions::default()).unwrap().data_type(),
            DataType::Int64
        );
    }

    #[test]
    fn test_null_strings_and_trim() {
        let col = strings("x", &[Some(" 1 "), Some("NA"), None, Some("")]);
        let parsed = col.try_parse(&ParserOptions::default()).unwrap();
        assert_eq!(
            parsed.values(),
            vec![Value::Int32(1), Value::Null, Value::Null, Value::Null]
        );
        assert!(parsed.is_nullable());

        let custom = ParserOptions::default().with_null_strings(["-"]);
        let col = strings("x", &[Some("-"), Some("2")]);
        assert_eq!(
            col.try_parse(&custom).unwrap().values(),
            vec![Value::Null, Value::Int32(2)]
        );
    }

    #[test]
    fn test_all_null_column_stays_string() {
        let col = strings("x", &[Some("NA"), None]);
        let report = col.try_parse_with_report(&ParserOptions::default()).unwrap();
        assert_eq!(report.parsed_as, None);
        assert_eq!(report.column.data_type(), DataType::String);
        assert_eq!(report.column.values(), vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_max_scale() {
        let col = strings("x", &[Some("1.5"), Some("2.125"), Some("3")]);
        let report = col.try_parse_with_report(&ParserOptions::default()).unwrap();
        assert_eq!(report.parsed_as, Some(ColType::Double));
        assert_eq!(report.max_scale, Some(3));

        let capped = ParserOptions::default().with_max_scale(2);
        let report = col.try_parse_with_report(&capped).unwrap();
        assert_eq!(report.max_scale, Some(2));

        let decimal = ParserOptions::default().skip_type(ColType::Double);
        let report = col.try_parse_with_report(&decimal).unwrap();
        assert_eq!(report.parsed_as, Some(ColType::Decimal));
        assert_eq!(report.column.get(0), Some(Value::Decimal(Decimal::new(15, 1))));
        assert_eq!(report.max_scale, Some(3));
    }

    #[test]
    fn test_forced_type_is_a_hard_error() {
        let col = strings("x", &[Some("1"), Some("bad")]);
        let err = col
            .parse_to(ColType::Int, &ParserOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "ParseError: can't parse 'bad' to type Int32");

        let options = ParserOptions::default().with_col_type("x", ColType::Long);
        assert!(matches!(
            col.try_parse(&options),
            Err(TabulonError::ParseError { .. })
        ));

        let ok = strings("x", &[Some("1"), Some("2")]);
        assert_eq!(
            ok.try_parse(&options).unwrap().data_type(),
            DataType::Int64
        );
    }

    #[test]
    fn test_non_string_column_is_unchanged() {
        let col = ValueColumn::infer("x", vec![Value::Int32(1)]);
        let report = col.try_parse_with_report(&ParserOptions::default()).unwrap();
        assert_eq!(report.column, Column::Value(col.clone()));
        assert_eq!(
            col.parse_to(ColType::Double, &ParserOptions::default())
                .unwrap()
                .data_type(),
            DataType::Float64
        );
    }

    #[test]
    fn test_parse_all_recurses() {
        let inner = DataFrame::new(vec![Column::Value(strings("n", &[Some("1.5")]))]).unwrap();
        let group = DataFrame::new(vec![Column::Value(strings("b", &[Some("true"), Some("no")]))])
            .unwrap();
        let df = DataFrame::new(vec![
            Column::Value(strings("d", &[Some("2024-01-01"), Some("2024-01-02")])),
            Column::new_group("g", group),
            Column::new_frame("f", vec![inner, DataFrame::empty(0)]),
        ])
        .unwrap();

        let parsed = df.parse_all(&ParserOptions::default()).unwrap();
        assert_eq!(parsed.column("d").unwrap().data_type(), DataType::Date);
        let b = parsed
            .column_at_path(&crate::path::ColumnPath::from(["g", "b"]))
            .unwrap();
        assert_eq!(b.data_type(), DataType::Bool);
        let nested = parsed.column("f").unwrap().frame_at(0).unwrap();
        assert_eq!(nested.column("n").unwrap().data_type(), DataType::Float64);
    }
}
