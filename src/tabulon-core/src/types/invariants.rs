//! Type invariant checking and value coercion.

use common_error::{TabulonError, TabulonResult};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::{DataType, Value};

/// Check that a value conforms to the expected data type.
pub fn check_type_invariants(value: &Value, expected: &DataType) -> TabulonResult<()> {
    match (value, expected) {
        // Null is valid for any type in a nullable column
        (Value::Null, _) | (_, DataType::Any) => Ok(()),

        // Direct type matches
        (Value::Bool(_), DataType::Bool)
        | (Value::Int32(_), DataType::Int32)
        | (Value::Int64(_), DataType::Int64)
        | (Value::Float64(_), DataType::Float64)
        | (Value::Decimal(_), DataType::Decimal)
        | (Value::String(_), DataType::String)
        | (Value::Date(_), DataType::Date)
        | (Value::Time(_), DataType::Time)
        | (Value::DateTime(_), DataType::DateTime)
        | (Value::Row(_), DataType::Row)
        | (Value::Frame(_), DataType::Frame) => Ok(()),

        // List element type check
        (Value::List(items), DataType::List(inner)) => {
            for (i, elem) in items.iter().enumerate() {
                check_type_invariants(elem, inner)
                    .map_err(|e| TabulonError::type_error(format!("List element {i}: {e}")))?;
            }
            Ok(())
        }

        (val, ty) => Err(TabulonError::type_error(format!(
            "Expected {}, got {}",
            ty.display_name(),
            val.type_name()
        ))),
    }
}

/// Convert a value to `target`, failing when the conversion loses meaning.
#[allow(clippy::cast_precision_loss)]
pub fn coerce_value(value: &Value, target: &DataType) -> TabulonResult<Value> {
    let fail = || {
        TabulonError::type_error(format!(
            "Cannot cast value '{value}' of type {} to {}",
            value.type_name(),
            target.display_name()
        ))
    };

    let out = match (value, target) {
        (Value::Null, _) => Value::Null,
        (v, DataType::Any) => v.clone(),
        (v, t) if check_type_invariants(v, t).is_ok() => v.clone(),
        (Value::Int32(i), DataType::Int64) => Value::Int64(i64::from(*i)),
        (Value::Int32(i), DataType::Float64) => Value::Float64(f64::from(*i)),
        (Value::Int64(i), DataType::Float64) => Value::Float64(*i as f64),
        (Value::Int32(i), DataType::Decimal) => Value::Decimal(Decimal::from(*i)),
        (Value::Int64(i), DataType::Decimal) => Value::Decimal(Decimal::from(*i)),
        (Value::Float64(f), DataType::Decimal) => {
            Value::Decimal(Decimal::from_f64(*f).ok_or_else(fail)?)
        }
        (Value::Date(d), DataType::DateTime) => {
            Value::DateTime(d.and_hms_opt(0, 0, 0).ok_or_else(fail)?)
        }
        (Value::List(items), DataType::List(inner)) => Value::List(
            items
                .iter()
                .map(|v| coerce_value(v, inner))
                .collect::<TabulonResult<_>>()?,
        ),
        (v, DataType::String) => Value::String(v.to_string()),
        _ => return Err(fail()),
    };
    Ok(out)
}
