use super::error::CqlError;
use super::value::{FromValue, Value};

/// One row of a result set: projected column names with their values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn value(&self, column: &str) -> Result<&Value, CqlError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
            .ok_or_else(|| CqlError::ColumnNotFound(column.to_string()))
    }

    /// Typed access to a column, e.g. `row.get::<BTreeSet<String>>("tags")`.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T, CqlError> {
        T::from_value(self.value(column)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_typed_getters() {
        let row = Row::new(
            vec!["tags".to_string(), "frames".to_string()],
            vec![Value::Null, Value::from(vec![1, 2])],
        );
        assert!(row.get::<BTreeSet<String>>("tags").unwrap().is_empty());
        assert_eq!(row.get::<Vec<i32>>("frames").unwrap(), vec![1, 2]);
        assert!(matches!(row.get::<Vec<i32>>("formats"), Err(CqlError::ColumnNotFound(_))));
    }
}
