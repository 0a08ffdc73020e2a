//! Core error types for tabulon.

use thiserror::Error;

/// Result type alias using `TabulonError`.
pub type TabulonResult<T> = std::result::Result<T, TabulonError>;

/// Generic boxed error for external error sources.
pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

/// Core error type for tabulon operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TabulonError {
    /// Columns of one table have different lengths.
    #[error("LengthMismatch: {0}")]
    LengthMismatch(String),

    /// Two sibling columns share a name.
    #[error("DuplicateColumn: {0}")]
    DuplicateColumn(String),

    /// A frame column was given a null cell.
    #[error("NullInFrameColumn: FrameColumn cannot contain null values (column '{0}')")]
    NullInFrameColumn(String),

    /// Column (or path) not found.
    #[error("ColumnNotFound: {0}")]
    ColumnNotFound(String),

    /// A placeholder column synthesized for a missing path was read.
    #[error("UnresolvedPlaceholder: column '{0}' does not exist and was only created as a placeholder")]
    UnresolvedPlaceholder(String),

    /// Type mismatch or invalid type operation.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A value could not be parsed into a forced target type.
    #[error("ParseError: can't parse '{value}' to type {target}")]
    ParseError {
        /// The offending raw value.
        value: String,
        /// Display name of the target type.
        target: String,
    },

    /// Invalid value provided.
    #[error("ValueError: {0}")]
    ValueError(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Internal error (bug in tabulon).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV reader/writer error.
    #[error("CsvError: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// External error from third-party libraries.
    #[error("ExternalError: {0}")]
    ExternalError(GenericError),
}

impl TabulonError {
    /// Create a new `LengthMismatch` error.
    pub fn length_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::LengthMismatch(msg.into())
    }

    /// Create a new `DuplicateColumn` error.
    pub fn duplicate_column<S: Into<String>>(name: S) -> Self {
        Self::DuplicateColumn(name.into())
    }

    /// Create a new `ColumnNotFound` error.
    pub fn column_not_found<S: Into<String>>(msg: S) -> Self {
        Self::ColumnNotFound(msg.into())
    }

    /// Create a new `TypeError`.
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a new `ParseError`.
    pub fn parse_error<V: Into<String>, T: Into<String>>(value: V, target: T) -> Self {
        Self::ParseError {
            value: value.into(),
            target: target.into(),
        }
    }

    /// Create a new `ValueError`.
    pub fn value_error<S: Into<String>>(msg: S) -> Self {
        Self::ValueError(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// Wrap an arbitrary external error.
    pub fn external<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExternalError(Box::new(err))
    }

    /// Whether this error reports a missing column or a read of a placeholder.
    pub const fn is_resolution_error(&self) -> bool {
        matches!(self, Self::ColumnNotFound(_) | Self::UnresolvedPlaceholder(_))
    }

    /// Whether this error reports a violated table invariant.
    pub const fn is_structural_error(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch(_) | Self::DuplicateColumn(_) | Self::NullInFrameColumn(_)
        )
    }
}

/// Ensure a condition holds, returning a `ValueError` if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::TabulonError::ValueError($msg.to_string()));
        }
    };
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::TabulonError::$variant(format!($($msg)*)));
        }
    };
}

/// Return early with a `ValueError`.
#[macro_export]
macro_rules! value_err {
    ($($arg:tt)*) => {
        return Err($crate::TabulonError::ValueError(format!($($arg)*)))
    };
}

/// Return early with a `TypeError`.
#[macro_export]
macro_rules! type_err {
    ($($arg:tt)*) => {
        return Err($crate::TabulonError::TypeError(format!($($arg)*)))
    };
}
