//! Configuration management for tabulon.
//!
//! Options are plain immutable values passed explicitly into every parse and
//! codec call. There is no process-wide parser state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Strings mapped to a missing value before any parser runs.
pub const DEFAULT_NULL_STRINGS: [&str; 9] =
    ["", "NA", "N/A", "null", "NULL", "None", "none", "NIL", "nil"];

/// Largest decimal scale reported by the parsing pipeline by default.
pub const DEFAULT_MAX_SCALE: u32 = 28;

/// Top-level tabulon configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulonConfig {
    /// Options for the string parsing pipeline.
    pub parser: ParserOptions,
    /// Options for delimited text.
    pub csv: CsvOptions,
    /// Options for JSON.
    pub json: JsonOptions,
}

impl TabulonConfig {
    /// Load a configuration from a JSON document. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Serialize this configuration as JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Target types that can be forced on a column or removed from the parser cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColType {
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 64-bit float.
    Double,
    /// Boolean.
    Boolean,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Calendar date.
    LocalDate,
    /// Wall-clock time.
    LocalTime,
    /// Date and time without zone.
    LocalDateTime,
    /// Keep the raw string.
    String,
}

/// Separators used when parsing locale-formatted numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    /// Character between integer and fraction digits.
    pub decimal_separator: char,
    /// Optional thousands separator, stripped before parsing.
    pub grouping_separator: Option<char>,
}

impl NumberLocale {
    /// `1,234.5`
    pub const US: Self = Self {
        decimal_separator: '.',
        grouping_separator: Some(','),
    };

    /// `1.234,5`
    pub const GERMAN: Self = Self {
        decimal_separator: ',',
        grouping_separator: Some('.'),
    };

    /// `1 234,5`
    pub const FRENCH: Self = Self {
        decimal_separator: ',',
        grouping_separator: Some('\u{a0}'),
    };

    /// Rewrite a locale-formatted number into the plain `1234.5` form.
    ///
    /// Returns `None` when the grouping separator appears after the decimal
    /// separator, which no locale allows.
    pub fn normalize(&self, s: &str) -> Option<String> {
        let mut out = String::with_capacity(s.len());
        let mut seen_decimal = false;
        for c in s.chars() {
            if Some(c) == self.grouping_separator {
                if seen_decimal {
                    return None;
                }
                continue;
            }
            if c == self.decimal_separator {
                seen_decimal = true;
                out.push('.');
            } else {
                out.push(c);
            }
        }
        Some(out)
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: None,
        }
    }
}

/// Options for converting raw strings into typed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Raw strings treated as missing values.
    pub null_strings: BTreeSet<String>,
    /// Locale used by numeric parsers. `None` means plain `1234.5` syntax.
    pub locale: Option<NumberLocale>,
    /// A chrono format string tried by the date/time parsers before the defaults.
    pub date_time_pattern: Option<String>,
    /// Parsers removed from the cascade.
    pub skip_types: BTreeSet<ColType>,
    /// Per-column forced target types.
    pub col_types: BTreeMap<String, ColType>,
    /// Cap for the reported decimal scale.
    pub max_scale: u32,
    /// Trim surrounding whitespace before parsing.
    pub trim: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            null_strings: DEFAULT_NULL_STRINGS.iter().map(|s| (*s).to_string()).collect(),
            locale: None,
            date_time_pattern: None,
            skip_types: BTreeSet::new(),
            col_types: BTreeMap::new(),
            max_scale: DEFAULT_MAX_SCALE,
            trim: true,
        }
    }
}

impl ParserOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the null-string set.
    #[must_use]
    pub fn with_null_strings<I, S>(mut self, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_strings = strings.into_iter().map(Into::into).collect();
        self
    }

    /// Add one string to the null-string set.
    #[must_use]
    pub fn with_null_string(mut self, s: impl Into<String>) -> Self {
        self.null_strings.insert(s.into());
        self
    }

    /// Set the number locale.
    #[must_use]
    pub const fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Set a date/time pattern (chrono `strftime` syntax).
    #[must_use]
    pub fn with_date_time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_time_pattern = Some(pattern.into());
        self
    }

    /// Remove a parser from the cascade.
    #[must_use]
    pub fn skip_type(mut self, ty: ColType) -> Self {
        self.skip_types.insert(ty);
        self
    }

    /// Force a target type for the named column.
    #[must_use]
    pub fn with_col_type(mut self, column: impl Into<String>, ty: ColType) -> Self {
        self.col_types.insert(column.into(), ty);
        self
    }

    /// Set the cap for the reported decimal scale.
    #[must_use]
    pub const fn with_max_scale(mut self, max_scale: u32) -> Self {
        self.max_scale = max_scale;
        self
    }

    /// Enable or disable trimming.
    #[must_use]
    pub const fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Whether `s` is one of the configured null strings.
    pub fn is_null_string(&self, s: &str) -> bool {
        self.null_strings.contains(s)
    }

    /// The forced type for a column, if any.
    pub fn col_type(&self, column: &str) -> Option<ColType> {
        self.col_types.get(column).copied()
    }
}

/// Options for reading and writing delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: char,
    /// Quote character.
    pub quote: char,
    /// Explicit header. When empty the first record is the header.
    pub header: Vec<String>,
    /// Records skipped before the header (or the data when a header is given).
    pub skip_lines: usize,
    /// Maximum number of data records read.
    pub read_lines: Option<usize>,
    /// Pad short records with nulls instead of failing.
    pub allow_missing_columns: bool,
    /// Parsing options applied to every column.
    pub parser: ParserOptions,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            header: Vec::new(),
            skip_lines: 0,
            read_lines: None,
            allow_missing_columns: true,
            parser: ParserOptions::default(),
        }
    }
}

impl CsvOptions {
    /// Tab-separated defaults.
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            ..Self::default()
        }
    }

    /// Set the delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use an explicit header.
    #[must_use]
    pub fn with_header<I, S>(mut self, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = header.into_iter().map(Into::into).collect();
        self
    }

    /// Skip leading records.
    #[must_use]
    pub const fn with_skip_lines(mut self, n: usize) -> Self {
        self.skip_lines = n;
        self
    }

    /// Limit the number of data records.
    #[must_use]
    pub const fn with_read_lines(mut self, n: usize) -> Self {
        self.read_lines = Some(n);
        self
    }

    /// Set the parser options.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

/// Options for reading and writing JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Pretty-print on write.
    pub pretty: bool,
    /// Run the parser cascade over string columns after reading.
    pub parse_strings: bool,
    /// Parsing options used when `parse_strings` is set.
    pub parser: ParserOptions,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            parse_strings: false,
            parser: ParserOptions::default(),
        }
    }
}
