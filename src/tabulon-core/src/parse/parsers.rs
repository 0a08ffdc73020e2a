//! Typed string parsers and the default cascade order.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common_config::{ColType, ParserOptions};
use rust_decimal::Decimal;

use crate::types::{DataType, Value};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: [&str; 1] = ["%Y-%m-%d"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Converts one trimmed, non-null string into a typed value.
pub trait StringParser: Send + Sync {
    /// Target this parser produces.
    fn col_type(&self) -> ColType;

    /// Parse `s`, or `None` when it is not a value of this type.
    fn parse(&self, s: &str, options: &ParserOptions) -> Option<Value>;

    /// Decimal scale of a parsed value, for numeric parsers.
    fn scale(&self, _parsed: &Value, _source: &str) -> Option<u32> {
        None
    }

    /// Column type produced by this parser.
    fn data_type(&self) -> DataType {
        self.col_type().into()
    }
}

struct IntParser;
struct LongParser;
struct DoubleParser;
struct BooleanParser;
struct DecimalParser;
struct DateParser;
struct TimeParser;
struct DateTimeParser;
struct IdentityParser;

/// Parsers tried, in order, when no type is forced.
static CASCADE: &[&dyn StringParser] = &[
    &IntParser,
    &LongParser,
    &DateTimeParser,
    &DateParser,
    &TimeParser,
    &DoubleParser,
    &BooleanParser,
    &DecimalParser,
];

/// The cascade minus the types in `options.skip_types`.
pub fn cascade(options: &ParserOptions) -> impl Iterator<Item = &'static dyn StringParser> + '_ {
    CASCADE
        .iter()
        .copied()
        .filter(|p| !options.skip_types.contains(&p.col_type()))
}

/// The parser producing `ty`.
pub fn parser_for(ty: ColType) -> &'static dyn StringParser {
    match ty {
        ColType::Int => &IntParser,
        ColType::Long => &LongParser,
        ColType::Double => &DoubleParser,
        ColType::Boolean => &BooleanParser,
        ColType::Decimal => &DecimalParser,
        ColType::LocalDate => &DateParser,
        ColType::LocalTime => &TimeParser,
        ColType::LocalDateTime => &DateTimeParser,
        ColType::String => &IdentityParser,
    }
}

/// Apply the configured number locale, if any.
fn normalize_number(s: &str, options: &ParserOptions) -> Option<String> {
    match &options.locale {
        Some(locale) => locale.normalize(s),
        None => Some(s.to_string()),
    }
}

/// Count of fraction digits in a plain or scientific number, net of the
/// exponent.
fn fraction_scale(s: &str) -> u32 {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], s[i + 1..].parse::<i64>().unwrap_or(0)),
        None => (s, 0),
    };
    let digits = mantissa
        .split_once('.')
        .map_or(0, |(_, frac)| frac.chars().filter(char::is_ascii_digit).count());
    let scale = i64::try_from(digits).unwrap_or(i64::MAX).saturating_sub(exponent);
    u32::try_from(scale.max(0)).unwrap_or(u32::MAX)
}

impl StringParser for IntParser {
    fn col_type(&self) -> ColType {
        ColType::Int
    }

    fn parse(&self, s: &str, _options: &ParserOptions) -> Option<Value> {
        s.parse::<i32>().ok().map(Value::Int32)
    }

    fn scale(&self, _parsed: &Value, _source: &str) -> Option<u32> {
        Some(0)
    }
}

impl StringParser for LongParser {
    fn col_type(&self) -> ColType {
        ColType::Long
    }

    fn parse(&self, s: &str, _options: &ParserOptions) -> Option<Value> {
        s.parse::<i64>().ok().map(Value::Int64)
    }

    fn scale(&self, _parsed: &Value, _source: &str) -> Option<u32> {
        Some(0)
    }
}

impl StringParser for DoubleParser {
    fn col_type(&self) -> ColType {
        ColType::Double
    }

    fn parse(&self, s: &str, options: &ParserOptions) -> Option<Value> {
        match s {
            "NaN" => return Some(Value::Float64(f64::NAN)),
            "Infinity" | "+Infinity" => return Some(Value::Float64(f64::INFINITY)),
            "-Infinity" => return Some(Value::Float64(f64::NEG_INFINITY)),
            _ => {}
        }
        // Rust also accepts "inf" and "nan" spellings; require a digit.
        if !s.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        normalize_number(s, options)?.parse::<f64>().ok().map(Value::Float64)
    }

    fn scale(&self, parsed: &Value, source: &str) -> Option<u32> {
        match parsed {
            Value::Float64(f) if f.is_finite() => Some(fraction_scale(source)),
            _ => None,
        }
    }
}

impl StringParser for BooleanParser {
    fn col_type(&self) -> ColType {
        ColType::Boolean
    }

    fn parse(&self, s: &str, _options: &ParserOptions) -> Option<Value> {
        match s.to_ascii_uppercase().as_str() {
            "T" | "TRUE" | "YES" => Some(Value::Bool(true)),
            "F" | "FALSE" | "NO" => Some(Value::Bool(false)),
            _ => None,
        }
    }
}

impl StringParser for DecimalParser {
    fn col_type(&self) -> ColType {
        ColType::Decimal
    }

    fn parse(&self, s: &str, options: &ParserOptions) -> Option<Value> {
        let s = normalize_number(s, options)?;
        Decimal::from_str(&s)
            .or_else(|_| Decimal::from_scientific(&s))
            .ok()
            .map(Value::Decimal)
    }

    fn scale(&self, parsed: &Value, _source: &str) -> Option<u32> {
        match parsed {
            Value::Decimal(d) => Some(d.scale()),
            _ => None,
        }
    }
}

/// Try the configured pattern first, then the defaults.
fn parse_with<T>(
    s: &str,
    options: &ParserOptions,
    defaults: &[&str],
    parse: impl Fn(&str, &str) -> chrono::ParseResult<T>,
) -> Option<T> {
    options
        .date_time_pattern
        .as_deref()
        .into_iter()
        .chain(defaults.iter().copied())
        .find_map(|fmt| parse(s, fmt).ok())
}

impl StringParser for DateTimeParser {
    fn col_type(&self) -> ColType {
        ColType::LocalDateTime
    }

    fn parse(&self, s: &str, options: &ParserOptions) -> Option<Value> {
        parse_with(s, options, &DATE_TIME_FORMATS, NaiveDateTime::parse_from_str)
            .map(Value::DateTime)
    }
}

impl StringParser for DateParser {
    fn col_type(&self) -> ColType {
        ColType::LocalDate
    }

    fn parse(&self, s: &str, options: &ParserOptions) -> Option<Value> {
        parse_with(s, options, &DATE_FORMATS, NaiveDate::parse_from_str).map(Value::Date)
    }
}

impl StringParser for TimeParser {
    fn col_type(&self) -> ColType {
        ColType::LocalTime
    }

    fn parse(&self, s: &str, options: &ParserOptions) -> Option<Value> {
        parse_with(s, options, &TIME_FORMATS, NaiveTime::parse_from_str).map(Value::Time)
    }
}

impl StringParser for IdentityParser {
    fn col_type(&self) -> ColType {
        ColType::String
    }

    fn parse(&self, s: &str, _options: &ParserOptions) -> Option<Value> {
        Some(Value::String(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use common_config::NumberLocale;

    use super::*;

    fn parse(ty: ColType, s: &str) -> Option<Value> {
        parser_for(ty).parse(s, &ParserOptions::default())
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse(ColType::Int, "42"), Some(Value::Int32(42)));
        assert_eq!(parse(ColType::Int, "3000000000"), None);
        assert_eq!(
            parse(ColType::Long, "3000000000"),
            Some(Value::Int64(3_000_000_000))
        );
        assert_eq!(parse(ColType::Int, "1.0"), None);
    }

    #[test]
    fn test_doubles() {
        assert_eq!(parse(ColType::Double, "2.5"), Some(Value::Float64(2.5)));
        assert_eq!(parse(ColType::Double, "1e3"), Some(Value::Float64(1000.0)));
        assert_eq!(parse(ColType::Double, "inf"), None);
        assert!(matches!(
            parse(ColType::Double, "NaN"),
            Some(Value::Float64(f)) if f.is_nan()
        ));

        let german = ParserOptions::default().with_locale(NumberLocale::GERMAN);
        assert_eq!(
            parser_for(ColType::Double).parse("1.234,5", &german),
            Some(Value::Float64(1234.5))
        );
    }

    #[test]
    fn test_booleans() {
        assert_eq!(parse(ColType::Boolean, "yes"), Some(Value::Bool(true)));
        assert_eq!(parse(ColType::Boolean, "F"), Some(Value::Bool(false)));
        assert_eq!(parse(ColType::Boolean, "TrUe"), Some(Value::Bool(true)));
        assert_eq!(parse(ColType::Boolean, "1"), None);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(
            parse(ColType::Decimal, "1.250"),
            Some(Value::Decimal(Decimal::new(1250, 3)))
        );
        assert!(parse(ColType::Decimal, "1.5e2").is_some());
        assert_eq!(parse(ColType::Decimal, "abc"), None);
    }

    #[test]
    fn test_temporal() {
        assert!(matches!(parse(ColType::LocalDate, "2024-02-29"), Some(Value::Date(_))));
        assert_eq!(parse(ColType::LocalDate, "2023-02-29"), None);
        assert!(matches!(
            parse(ColType::LocalDateTime, "2024-01-01T10:30:00"),
            Some(Value::DateTime(_))
        ));
        assert!(matches!(
            parse(ColType::LocalDateTime, "2024-01-01 10:30"),
            Some(Value::DateTime(_))
        ));
        assert!(matches!(parse(ColType::LocalTime, "10:30"), Some(Value::Time(_))));

        let custom = ParserOptions::default().with_date_time_pattern("%d/%m/%Y");
        assert!(matches!(
            parser_for(ColType::LocalDate).parse("31/12/2023", &custom),
            Some(Value::Date(_))
        ));
    }

    #[test]
    fn test_scale() {
        assert_eq!(fraction_scale("1.250"), 3);
        assert_eq!(fraction_scale("12"), 0);
        assert_eq!(fraction_scale("1.5e-2"), 3);
        assert_eq!(fraction_scale("1.5e4"), 0);
    }

    #[test]
    fn test_cascade_skips() {
        let options = ParserOptions::default().skip_type(ColType::Int);
        let types: Vec<ColType> = cascade(&options).map(|p| p.col_type()).collect();
        assert_eq!(types[0], ColType::Long);
        assert!(!types.contains(&ColType::Int));
    }
}
