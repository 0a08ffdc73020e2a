//! Type guessing for freshly computed values.

use super::{DataType, Value};

/// Result of [`guess_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeGuess {
    /// Inferred column type.
    pub data_type: DataType,
    /// Whether any value was null.
    pub nullable: bool,
}

/// Guess the column type of `values`.
///
/// The first non-null value gives the initial guess. Every later value must
/// have the same type; when one does not, the guess widens to the common
/// supertype of the two, or to `Any` when there is none. A sequence of only
/// nulls is typed `Null`.
pub fn guess_type<'a, I>(values: I) -> TypeGuess
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut data_type: Option<DataType> = None;
    let mut nullable = false;

    for value in values {
        if value.is_null() {
            nullable = true;
            continue;
        }
        let ty = value.data_type();
        data_type = Some(match data_type {
            None => ty,
            Some(current) if current == ty => current,
            Some(DataType::Any) => DataType::Any,
            Some(current) => current.common_supertype(&ty).unwrap_or(DataType::Any),
        });
    }

    TypeGuess {
        data_type: data_type.unwrap_or(DataType::Null),
        nullable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_values() {
        let values = [Value::Int32(1), Value::Null, Value::Int32(3)];
        let guess = guess_type(&values);
        assert_eq!(guess.data_type, DataType::Int32);
        assert!(guess.nullable);
    }

    #[test]
    fn test_widening() {
        let values = [Value::Int32(1), Value::Int64(2), Value::Float64(0.5)];
        assert_eq!(guess_type(&values).data_type, DataType::Float64);
    }

    #[test]
    fn test_heterogeneous_falls_back_to_any() {
        let values = [Value::Int32(1), Value::from("a"), Value::Int32(2)];
        let guess = guess_type(&values);
        assert_eq!(guess.data_type, DataType::Any);
        assert!(!guess.nullable);
    }

    #[test]
    fn test_only_nulls() {
        let values = [Value::Null, Value::Null];
        assert_eq!(
            guess_type(&values),
            TypeGuess {
                data_type: DataType::Null,
                nullable: true
            }
        );
        assert_eq!(guess_type(std::iter::empty()).data_type, DataType::Null);
    }
}
