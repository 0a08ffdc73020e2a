//! Value columns: a typed sequence of scalar cells.

use std::sync::Arc;

use common_error::{TabulonError, TabulonResult};

use crate::types::{check_type_invariants, guess_type, DataType, Value};

/// A named column of scalar (or opaque) values.
///
/// Storage is shared: renaming or re-wrapping a column never copies cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueColumn {
    name: String,
    data_type: DataType,
    nullable: bool,
    values: Arc<Vec<Value>>,
}

impl ValueColumn {
    /// Create a column with a declared type, checking every value against it.
    pub fn new(
        name: impl Into<String>,
        values: Vec<Value>,
        data_type: DataType,
    ) -> TabulonResult<Self> {
        let name = name.into();
        for (i, value) in values.iter().enumerate() {
            check_type_invariants(value, &data_type).map_err(|e| {
                TabulonError::type_error(format!("column '{name}', row {i}: {e}"))
            })?;
        }
        Ok(Self::from_checked(name, values, data_type))
    }

    /// Create a column whose type is guessed from its values.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let guess = guess_type(&values);
        Self {
            name: name.into(),
            data_type: guess.data_type,
            nullable: guess.nullable,
            values: Arc::new(values),
        }
    }

    pub(crate) fn from_checked(name: String, values: Vec<Value>, data_type: DataType) -> Self {
        let nullable = values.iter().any(Value::is_null);
        Self {
            name,
            data_type,
            nullable,
            values: Arc::new(values),
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared or inferred type.
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Whether the column holds at least one null.
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate over the values.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Same cells under a new name.
    #[must_use]
    pub fn rename(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// New cells, same name and type.
    pub(crate) fn with_values(&self, values: Vec<Value>) -> Self {
        Self::from_checked(self.name.clone(), values, self.data_type.clone())
    }

    /// Whether two columns share the same cell storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_types() {
        let col = ValueColumn::new("a", vec![Value::Int32(1), Value::Null], DataType::Int32).unwrap();
        assert!(col.is_nullable());
        assert_eq!(col.len(), 2);

        let err = ValueColumn::new("a", vec![Value::from("x")], DataType::Int32).unwrap_err();
        assert!(err.to_string().contains("column 'a', row 0"));
    }

    #[test]
    fn test_infer() {
        let col = ValueColumn::infer("a", vec![Value::Int32(1), Value::Int64(2)]);
        assert_eq!(col.data_type(), &DataType::Int64);
        assert!(!col.is_nullable());
    }

    #[test]
    fn test_rename_shares_storage() {
        let col = ValueColumn::infer("a", vec![Value::from("x")]);
        let renamed = col.rename("b");
        assert_eq!(renamed.name(), "b");
        assert!(renamed.shares_storage(&col));
    }
}
