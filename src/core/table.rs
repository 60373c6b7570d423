use super::column::Column;
use super::error::CqlError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, CqlError> {
        let name = name.into();
        let keys = columns.iter().filter(|c| c.primary_key).count();
        if keys != 1 {
            return Err(CqlError::InvalidRequest(format!(
                "Table '{name}' must declare exactly one primary key column, found {keys}"
            )));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(CqlError::InvalidRequest(format!(
                    "Multiple definition of identifier {}",
                    column.name
                )));
            }
            if column.primary_key && column.data_type.is_collection() {
                return Err(CqlError::InvalidRequest(format!(
                    "Invalid collection type for PRIMARY KEY component {}",
                    column.name
                )));
            }
        }
        Ok(Self { name, columns })
    }

    pub fn column(&self, name: &str) -> Result<&Column, CqlError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CqlError::ColumnNotFound(name.to_string()))
    }

    /// The partition key column. Construction guarantees there is exactly one.
    pub fn key_column(&self) -> &Column {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .unwrap_or(&self.columns[0])
    }
}
