//! Data type definitions for column schemas.

use common_config::ColType;
use serde::{Deserialize, Serialize};

/// Data type of a column.
///
/// Nullability is tracked next to the type (see `ValueColumn::is_nullable`),
/// so `Null` is the type of a column holding only missing values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Only missing values.
    Null,
    /// Boolean type.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Arbitrary-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Calendar date.
    Date,
    /// Wall-clock time.
    Time,
    /// Date and time without zone.
    DateTime,
    /// List of elements with the given type.
    List(Box<Self>),
    /// Row of a group column.
    Row,
    /// Nested table of a frame column.
    Frame,
    /// Top type; heterogeneous values.
    Any,
}

impl DataType {
    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::Float64 | Self::Decimal
        )
    }

    /// Check if this type is a temporal type.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime)
    }

    /// Check if this type is a string type.
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Get the display name for this type.
    pub fn display_name(&self) -> String {
        match self {
            Self::Null => "Null".to_string(),
            Self::Bool => "Bool".to_string(),
            Self::Int32 => "Int32".to_string(),
            Self::Int64 => "Int64".to_string(),
            Self::Float64 => "Float64".to_string(),
            Self::Decimal => "Decimal".to_string(),
            Self::String => "String".to_string(),
            Self::Date => "Date".to_string(),
            Self::Time => "Time".to_string(),
            Self::DateTime => "DateTime".to_string(),
            Self::List(inner) => format!("List<{}>", inner.display_name()),
            Self::Row => "Row".to_string(),
            Self::Frame => "Frame".to_string(),
            Self::Any => "Any".to_string(),
        }
    }

    /// Check if values of this type can be converted to `target` by a cast.
    pub fn can_coerce_to(&self, target: &Self) -> bool {
        if self == target {
            return true;
        }

        match (self, target) {
            (Self::Null | Self::Any, _)
            | (_, Self::Any | Self::String)
            | (Self::Int32, Self::Int64 | Self::Float64 | Self::Decimal)
            | (Self::Int64 | Self::Float64, Self::Float64 | Self::Decimal)
            | (Self::Date, Self::DateTime) => true,
            (Self::List(a), Self::List(b)) => a.can_coerce_to(b),
            _ => false,
        }
    }

    /// Get the common supertype of two types (for type inference).
    pub fn common_supertype(&self, other: &Self) -> Option<Self> {
        if self == other {
            return Some(self.clone());
        }

        match (self, other) {
            (Self::Null, t) | (t, Self::Null) => Some(t.clone()),
            (Self::Any, _) | (_, Self::Any) => Some(Self::Any),
            (Self::Int32, Self::Int64) | (Self::Int64, Self::Int32) => Some(Self::Int64),
            (Self::Int32 | Self::Int64, Self::Float64)
            | (Self::Float64, Self::Int32 | Self::Int64) => Some(Self::Float64),
            (Self::Int32 | Self::Int64 | Self::Float64, Self::Decimal)
            | (Self::Decimal, Self::Int32 | Self::Int64 | Self::Float64) => Some(Self::Decimal),
            (Self::List(a), Self::List(b)) => Some(Self::List(Box::new(
                a.common_supertype(b).unwrap_or(Self::Any),
            ))),
            _ => None,
        }
    }

    /// Fold a sequence of types into their common supertype, `Any` when two
    /// of them have none and `Null` for an empty sequence.
    pub fn unify<I: IntoIterator<Item = Self>>(types: I) -> Self {
        types.into_iter().fold(Self::Null, |acc, t| {
            acc.common_supertype(&t).unwrap_or(Self::Any)
        })
    }
}

impl From<ColType> for DataType {
    fn from(ty: ColType) -> Self {
        match ty {
            ColType::Int => Self::Int32,
            ColType::Long => Self::Int64,
            ColType::Double => Self::Float64,
            ColType::Boolean => Self::Bool,
            ColType::Decimal => Self::Decimal,
            ColType::LocalDate => Self::Date,
            ColType::LocalTime => Self::Time,
            ColType::LocalDateTime => Self::DateTime,
            ColType::String => Self::String,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
